//! Raw paragraph text from a DOCX body; formatting is discarded.

use crate::error::{DriveseekError, Result};

pub fn extract(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| DriveseekError::Processing(format!("DOCX parse error: {e}")))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(paragraph) => {
                push_line(&mut text, &paragraph_text(paragraph));
            }
            docx_rs::DocumentChild::Table(table) => {
                push_line(&mut text, &table_text(table));
            }
            _ => {}
        }
    }

    Ok(text)
}

fn push_line(text: &mut String, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(line);
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut content = String::new();
    for para_child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = para_child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(text) = run_child {
                    content.push_str(&text.text);
                }
            }
        }
    }
    content
}

fn table_text(table: &docx_rs::Table) -> String {
    let mut lines = Vec::new();
    for table_child in &table.rows {
        let docx_rs::TableChild::TableRow(row) = table_child;
        let mut cells = Vec::new();
        for row_child in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = row_child;
            let mut cell_text = String::new();
            for cell_child in &cell.children {
                if let docx_rs::TableCellContent::Paragraph(paragraph) = cell_child {
                    let para_text = paragraph_text(paragraph);
                    if !cell_text.is_empty() {
                        cell_text.push(' ');
                    }
                    cell_text.push_str(&para_text);
                }
            }
            let trimmed = cell_text.trim().to_string();
            if !trimmed.is_empty() {
                cells.push(trimmed);
            }
        }
        if !cells.is_empty() {
            lines.push(cells.join(" "));
        }
    }
    lines.join("\n")
}
