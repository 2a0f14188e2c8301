//! Column contract for the period export.
//!
//! The export carries four required columns. Each one is known to the rest of
//! the pipeline by a canonical name and is located in the source file by an
//! alias on the third physical row. [`ColumnContract::resolve`] checks every
//! alias before any cell is touched, so a failure always names all of the
//! missing columns at once.

use std::collections::HashMap;

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    SequentialIndex,
    Revenue,
    Expenses,
    SalesCount,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 4] = [
        CanonicalField::SequentialIndex,
        CanonicalField::Revenue,
        CanonicalField::Expenses,
        CanonicalField::SalesCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::SequentialIndex => "mes_sequencial",
            CanonicalField::Revenue => "faturamento",
            CanonicalField::Expenses => "despesas",
            CanonicalField::SalesCount => "qtd_vendas",
        }
    }

    /// Header text expected on the authoritative header row.
    pub fn alias(self) -> &'static str {
        match self {
            CanonicalField::SequentialIndex => "mes_sequencial",
            CanonicalField::Revenue => "faturamento",
            CanonicalField::Expenses => "custos_totais",
            CanonicalField::SalesCount => "total_vendas",
        }
    }

    fn slot(self) -> usize {
        match self {
            CanonicalField::SequentialIndex => 0,
            CanonicalField::Revenue => 1,
            CanonicalField::Expenses => 2,
            CanonicalField::SalesCount => 3,
        }
    }
}

/// Trims and lower-cases a header cell.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct ColumnContract;

impl ColumnContract {
    pub fn new() -> Self {
        ColumnContract
    }

    pub fn required_aliases(&self) -> Vec<&'static str> {
        CanonicalField::ALL.iter().map(|field| field.alias()).collect()
    }

    /// Locates every required alias in already-normalised `headers`.
    pub fn resolve(&self, headers: &[String]) -> Result<ColumnMap> {
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            positions.entry(header.as_str()).or_insert(idx);
        }

        let mut slots = [0usize; 4];
        let mut missing = Vec::new();
        for field in CanonicalField::ALL {
            match positions.get(field.alias()) {
                Some(&idx) => slots[field.slot()] = idx,
                None => missing.push(field.alias().to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(ReportError::MissingColumns { missing });
        }
        Ok(ColumnMap { slots })
    }
}

/// Source column position of each canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    slots: [usize; 4],
}

impl ColumnMap {
    pub fn position(&self, field: CanonicalField) -> usize {
        self.slots[field.slot()]
    }
}
