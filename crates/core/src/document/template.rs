//! The IT control action plan description.

use super::types::{Block, Document, Inline, TableAttrs, TableCell, TableRow};

const TABLE_HEADERS: [&str; 5] = [
    "IT Control",
    "Target Date",
    "Nominated Delegate",
    "JIRA Ticket",
    "Oversight Team",
];

/// Pre-authored control rows placed under the table header when tickets are
/// collected under an epic.
const CONTROL_ROWS: [[&str; 5]; 4] = [
    ["User Access Review", "31.03", "", "", "IT Compliance"],
    ["Privileged Access Review", "30.06", "", "", "IT Compliance"],
    ["Backup and Restore Test", "30.09", "", "", "IT Operations"],
    ["Change Management Review", "30.11", "", "", "IT Compliance"],
];

/// How the owner appears in the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerRef {
    /// Literal display name.
    Plain(String),
    /// Mention carrying the resolved account id.
    Mention { id: String, display: String },
}

impl OwnerRef {
    fn to_inline(&self) -> Inline {
        match self {
            OwnerRef::Plain(name) => Inline::text(name.clone()),
            OwnerRef::Mention { id, display } => Inline::mention(id.clone(), display.clone()),
        }
    }
}

/// Everything the template needs for one ticket.
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    pub item_name: &'a str,
    pub owner: OwnerRef,
    pub doc_url: &'a str,
    pub plan_year: u32,
    /// Fill the control table with the pre-authored rows.
    pub include_control_rows: bool,
}

/// Ticket summary line.
///
/// Tickets whose owner was resolved through the lookup sheet use a dash
/// between the item name and the plan title.
pub fn summary(item_name: &str, plan_year: u32, dashed: bool) -> String {
    if dashed {
        format!("{} - {} IT Control Action Plan", item_name, plan_year)
    } else {
        format!("{} {} IT Control Action Plan", item_name, plan_year)
    }
}

/// Render the description document.
pub fn build_description(ctx: &TemplateContext<'_>) -> Document {
    let owner = ctx.owner.to_inline();
    let year = ctx.plan_year;

    let mut content = vec![
        Block::paragraph(vec![
            Inline::strong("Application: "),
            Inline::text(ctx.item_name),
        ]),
        Block::paragraph(vec![Inline::strong("Business Owner: "), owner.clone()]),
        Block::paragraph(vec![
            Inline::strong("Data Owner: "),
            owner,
            Inline::HardBreak,
        ]),
        Block::paragraph(vec![Inline::strong("Overview")]),
        Block::paragraph(vec![Inline::text(
            "IT controls are established to ensure that particular requirements driven by \
             internal policies, procedures, standards or by regulatory requirements are in \
             place and effective.",
        )]),
        Block::paragraph(vec![
            Inline::text("Moreover, the IT Controls are "),
            Inline::strong("required by regulations"),
            Inline::text(" such as "),
            Inline::strong("BAIT from BaFin"),
            Inline::text(" (the regulatory authority that provides our Banking license)."),
        ]),
        Block::paragraph(vec![
            Inline::strong(
                "As such, we require your complete engagement to ensure the successful \
                 execution of our planned controls for this year.",
            ),
            Inline::HardBreak,
        ]),
        Block::paragraph(vec![Inline::strong("Next Steps")]),
        Block::paragraph(vec![
            Inline::text("1. "),
            Inline::strong("Review"),
            Inline::text(" the IT Controls applicable to system below, noting "),
            Inline::strong("key dates"),
            Inline::text(format!(
                " and incorporating them into your team\u{2019}s {} roadmap.",
                year
            )),
        ]),
        Block::paragraph(vec![
            Inline::text("2. "),
            Inline::strong("Nominate a delegate"),
            Inline::text(
                " from your team who will be engaged to execute the IT Control (tag their \
                 name in the \u{2033}Nominated Delegate\u{2033} Column).",
            ),
        ]),
        Block::paragraph(vec![
            Inline::text("3. "),
            Inline::strong("Flag any concerns"),
            Inline::text(
                " you have in the comments of this ticket (e.g. timeline conflicts, unclear \
                 IT Control guidelines, etc.)",
            ),
            Inline::HardBreak,
        ]),
        Block::paragraph(vec![
            Inline::text(format!("For more details in the {} IT Controls see ", year)),
            Inline::link(ctx.doc_url, ctx.doc_url),
            Inline::HardBreak,
        ]),
    ];

    content.push(control_table(year, ctx.include_control_rows));

    Document::new(content)
}

fn control_table(year: u32, include_control_rows: bool) -> Block {
    let header = TableRow {
        content: TABLE_HEADERS
            .iter()
            .map(|title| TableCell::TableHeader {
                content: vec![Block::paragraph(vec![Inline::strong(*title)])],
            })
            .collect(),
    };

    let mut rows = vec![header];
    if include_control_rows {
        rows.extend(CONTROL_ROWS.iter().map(|cells| TableRow {
            content: cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    // Target dates are day.month; the year comes from the plan.
                    let text = if i == 1 {
                        format!("{}.{}", cell, year)
                    } else {
                        cell.to_string()
                    };
                    let inline = if text.is_empty() {
                        vec![]
                    } else {
                        vec![Inline::text(text)]
                    };
                    TableCell::TableCell {
                        content: vec![Block::paragraph(inline)],
                    }
                })
                .collect(),
        }));
    }

    Block::Table {
        attrs: TableAttrs::default(),
        content: rows,
    }
}
