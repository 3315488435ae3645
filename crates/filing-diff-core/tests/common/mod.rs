//! Synthetic inline XBRL filings for integration tests.

#![allow(dead_code)]

use filing_diff_core::{parse_filing, ParsedDocument};

pub const IX_NS: &str = "http://www.xbrl.org/2013/inlineXBRL";

enum Block {
    Heading(String),
    Paragraph(String),
    Fact { concept: String, text: String },
    Table(Vec<Vec<String>>),
    PageBreak,
}

struct PlannedSection {
    id: String,
    title: String,
    page: u32,
    blocks: Vec<Block>,
}

/// Builds a 10-K shaped XHTML document: cover, table of contents, then one
/// heading per section followed by its content blocks.
pub struct FilingBuilder {
    sections: Vec<PlannedSection>,
    page: u32,
}

impl FilingBuilder {
    pub fn new() -> Self {
        Self { sections: Vec::new(), page: 1 }
    }

    pub fn section(mut self, id: &str, title: &str) -> Self {
        self.sections.push(PlannedSection {
            id: id.to_string(),
            title: title.to_string(),
            page: self.page,
            blocks: vec![Block::Heading(title.to_string())],
        });
        self
    }

    pub fn paragraph(self, text: &str) -> Self {
        self.block(Block::Paragraph(text.to_string()))
    }

    /// A paragraph wrapped in an `ix:nonNumeric` fact.
    pub fn fact(self, concept: &str, text: &str) -> Self {
        self.block(Block::Fact {
            concept: concept.to_string(),
            text: text.to_string(),
        })
    }

    pub fn table(self, rows: &[&[&str]]) -> Self {
        let rows = rows.iter().map(|row| row.iter().map(|cell| cell.to_string()).collect()).collect();
        self.block(Block::Table(rows))
    }

    /// Ends the current page with a centered page number.
    pub fn page_break(mut self) -> Self {
        self = self.block(Block::PageBreak);
        self.page += 1;
        self
    }

    fn block(mut self, block: Block) -> Self {
        if let Some(section) = self.sections.last_mut() {
            section.blocks.push(block);
        }
        self
    }

    pub fn build(&self) -> String {
        let mut toc_rows = String::new();
        for section in &self.sections {
            toc_rows.push_str(&format!(
                r##"<tr><td><a href="#{id}">{title}</a></td><td style="text-align:right"><a href="#{id}">{page}</a></td></tr>"##,
                id = section.id,
                title = escape(&section.title),
                page = section.page
            ));
        }

        let mut body = String::new();
        let mut page = 1;
        for section in &self.sections {
            for block in &section.blocks {
                match block {
                    Block::Heading(title) => body.push_str(&format!(
                        r#"<div id="{}"><span style="font-weight:bold;font-size:10pt">{}</span></div>"#,
                        section.id,
                        escape(title)
                    )),
                    Block::Paragraph(text) => {
                        body.push_str(&format!("<div><span>{}</span></div>", escape(text)));
                    }
                    Block::Fact { concept, text } => body.push_str(&format!(
                        r#"<div><span><ix:nonNumeric name="{}" contextRef="FY2024" escape="true">{}</ix:nonNumeric></span></div>"#,
                        concept,
                        escape(text)
                    )),
                    Block::Table(rows) => {
                        body.push_str("<div><table>");
                        for row in rows {
                            body.push_str("<tr>");
                            for cell in row {
                                body.push_str(&format!("<td><span>{}</span></td>", escape(cell)));
                            }
                            body.push_str("</tr>");
                        }
                        body.push_str("</table></div>");
                    }
                    Block::PageBreak => {
                        body.push_str(&format!(
                            r#"<div><div><div style="text-align: center"><span>{}</span></div></div></div><hr style="page-break-after:always"/>"#,
                            page
                        ));
                        page += 1;
                    }
                }
                body.push('\n');
            }
        }

        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:ix="{ix}">
<head><title>ACME Corp 10-K</title></head>
<body>
<div style="display:none"><ix:header><ix:hidden><ix:nonNumeric name="dei:DocumentType" contextRef="FY2024">10-K</ix:nonNumeric></ix:hidden></ix:header></div>
<div><span>ACME CORP</span></div>
<div><span>TABLE OF CONTENTS</span></div>
<div><table>{rows}</table></div>
{body}</body>
</html>"#,
            ix = IX_NS,
            rows = toc_rows,
            body = body
        )
    }

    pub fn parse(&self) -> ParsedDocument {
        parse_filing(&self.build()).expect("fixture filing parses")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// A small annual report used across tests.
pub fn annual_report() -> FilingBuilder {
    annual_report_after(FilingBuilder::new())
}

/// The [`annual_report`] sections appended to whatever `preface` holds.
pub fn annual_report_after(preface: FilingBuilder) -> FilingBuilder {
    preface
        .section("i1", "Item 1. Business")
        .paragraph("Acme Corp designs and sells anvils to customers in 19 countries.")
        .paragraph("We employ approximately 2,100 associates.")
        .page_break()
        .section("i1a", "Item 1A. Risk Factors")
        .paragraph("Demand for anvils is cyclical and may decline.")
        .paragraph("Steel prices may rise faster than we can raise our prices.")
        .page_break()
        .section("i8", "Item 8. Financial Statements")
        .table(&[&["", "2024", "2023"], &["Net sales", "611", "573"], &["Net income", "15", "11"]])
        .page_break()
        .section("fsn", "Notes to Consolidated Financial Statements")
        .fact("us-gaap:SignificantAccountingPoliciesTextBlock", "Note 1 - Summary of Significant Accounting Policies")
        .paragraph("The consolidated financial statements include the accounts of Acme Corp.")
        .fact("us-gaap:RevenueFromContractWithCustomerTextBlock", "Note 2 - Revenue")
        .paragraph("Revenue is recognized when control of an anvil transfers to the customer.")
        .page_break()
        .section("i9a", "Item 9A. Controls and Procedures")
        .paragraph("Our disclosure controls and procedures were effective.")
        .page_break()
}
