#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;
use tempfile::{TempDir, tempdir};

pub const DECORATIVE_ROWS: [&str; 2] = [
    "MES,faturamento,despesas,qtd_vendas",
    "Obrigatório,Obrigatório,Obrigatório,Obrigatório",
];
pub const ALIAS_HEADER: &str = "mes_sequencial,faturamento,custos_totais,total_vendas";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file bytes");
        path
    }

    /// Writes an export CSV: the two decorative rows, `header`, then `body`.
    pub fn write_export(&self, name: &str, header: &str, body: &[String]) -> PathBuf {
        let mut contents = String::new();
        for line in DECORATIVE_ROWS.iter().copied().chain([header]) {
            contents.push_str(line);
            contents.push('\n');
        }
        for line in body {
            contents.push_str(line);
            contents.push('\n');
        }
        self.write(name, &contents)
    }

    /// Writes an export workbook with `blank_rows` empty rows before the
    /// decorative block.
    pub fn write_xlsx_export(&self, name: &str, blank_rows: u32, rows: &[[f64; 4]]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let header_rows = [
            ["MES", "faturamento", "despesas", "qtd_vendas"],
            ["Obrigatório", "Obrigatório", "Obrigatório", "Obrigatório"],
            ["Mes_Sequencial", "Faturamento", "Custos_Totais", "Total_Vendas"],
        ];
        for (r, cells) in header_rows.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                sheet
                    .write_string(blank_rows + r as u32, c as u16, *cell)
                    .expect("write header");
            }
        }
        for (r, cells) in rows.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                sheet
                    .write_number(blank_rows + 3 + r as u32, c as u16, *value)
                    .expect("write value");
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }
}

/// Body lines following `revenue = base_rev + rev_step * i`, same for expenses.
pub fn linear_body(count: usize, base_rev: f64, rev_step: f64, base_exp: f64, exp_step: f64) -> Vec<String> {
    (1..=count)
        .map(|i| {
            let x = i as f64;
            format!(
                "{i},{},{},{}",
                base_rev + rev_step * x,
                base_exp + exp_step * x,
                i * 10
            )
        })
        .collect()
}

pub fn read_first_sheet(path: &Path) -> (String, Range<Data>) {
    let mut workbook = open_workbook_auto(path).expect("open workbook");
    let name = workbook.sheet_names()[0].clone();
    let range = workbook
        .worksheet_range_at(0)
        .expect("sheet present")
        .expect("read sheet");
    (name, range)
}

pub fn cell_f64(range: &Range<Data>, row: u32, col: u32) -> Option<f64> {
    match range.get_value((row, col)) {
        Some(Data::Float(v)) => Some(*v),
        Some(Data::Int(v)) => Some(*v as f64),
        _ => None,
    }
}

pub fn cell_string(range: &Range<Data>, row: u32, col: u32) -> Option<String> {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Reads one part of the xlsx package as text.
pub fn read_package_part(path: &Path, part: &str) -> String {
    let file = File::open(path).expect("open package");
    let mut archive = zip::ZipArchive::new(file).expect("read zip");
    let mut entry = archive.by_name(part).expect("part present");
    let mut contents = String::new();
    entry.read_to_string(&mut contents).expect("read part");
    contents
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// Every `<tag>` element of `xml`, opening tag through its close.
pub fn xml_elements<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = xml[cursor..].find(&open) {
        let start = cursor + offset;
        let after_name = start + open.len();
        cursor = after_name;
        if !matches!(xml.as_bytes().get(after_name), Some(b' ' | b'>' | b'/')) {
            continue;
        }
        let tag_end = start + xml[start..].find('>').expect("unterminated tag") + 1;
        let end = if xml[..tag_end].ends_with("/>") {
            tag_end
        } else {
            tag_end + xml[tag_end..].find(&close).expect("unclosed element") + close.len()
        };
        found.push(&xml[start..end]);
        cursor = end;
    }
    found
}

/// Value of `name` on the opening tag of `element`.
pub fn xml_attr<'a>(element: &'a str, name: &str) -> Option<&'a str> {
    let opening = &element[..element.find('>')?];
    let needle = format!(" {name}=\"");
    let start = opening.find(&needle)? + needle.len();
    let len = opening[start..].find('"')?;
    Some(&opening[start..start + len])
}
