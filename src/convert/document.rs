//! # 文档后端
//!
//! 将纯文本包装为单页 PDF（A4，Helvetica 12pt，距左上角 50pt 起排）。
//!
//! 只支持 WinAnsi 可编码的字符：ASCII 可打印字符与 Latin-1 补充区，
//! 其余字符视为编码失败。
//!
//! ## 依赖关系
//! - 被 `convert/mod.rs` 调用
//! - 无外部 crate 依赖

use std::fmt::Write as _;

/// PDF MIME 类型
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 12.0;
const LEADING: f32 = 14.4;
const TAB_WIDTH: usize = 4;

/// 文本编码失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    NotUtf8,
    Unencodable { ch: char, line: usize },
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::NotUtf8 => write!(f, "input is not valid UTF-8 text"),
            TextError::Unencodable { ch, line } => write!(
                f,
                "WinAnsi cannot encode {:?} (U+{:04X}) on line {}",
                ch, *ch as u32, line
            ),
        }
    }
}

/// 将文本内容渲染为单页 PDF
pub fn text_to_pdf(content: &[u8]) -> Result<Vec<u8>, TextError> {
    let text = std::str::from_utf8(content).map_err(|_| TextError::NotUtf8)?;

    let mut stream = String::new();
    stream.push_str("BT\n");
    let _ = writeln!(stream, "/F1 {} Tf", FONT_SIZE);
    let _ = writeln!(stream, "{} TL", LEADING);
    let _ = writeln!(stream, "{} {:.2} Td", MARGIN, PAGE_HEIGHT - MARGIN);

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            stream.push_str("T*\n");
        }
        let encoded = encode_line(line, i + 1)?;
        let _ = writeln!(stream, "({}) Tj", encoded);
    }
    stream.push_str("ET\n");

    Ok(assemble(&stream))
}

/// 将一行文本编码为 PDF 字符串字面量内容
fn encode_line(line: &str, line_no: usize) -> Result<String, TextError> {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\r' => {}
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{A0}'..='\u{FF}' => {
                let _ = write!(out, "\\{:03o}", ch as u32);
            }
            _ => return Err(TextError::Unencodable { ch, line: line_no }),
        }
    }
    Ok(out)
}

/// 组装 PDF 对象、交叉引用表与 trailer
fn assemble(stream: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = write!(xref, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out.extend_from_slice(xref.as_bytes());
    out
}
