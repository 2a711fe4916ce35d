//! CSV extraction shim for the works observatory export.
//!
//! The export is `;`-delimited, latin1-encoded, and carries far more
//! columns than the registry stores. This module selects the useful
//! subset by header name, maps blank cells to `None`, and hands
//! pre-normalized rows to the bulk loader. The one fatal error surface
//! (an unreadable file) lives here, not in the core.

use crate::core::error::WorksError;
use crate::core::loader::WorkRow;
use csv::{ByteRecord, ReaderBuilder};
use std::path::Path;

struct ColumnIndex {
    environment: Option<usize>,
    name: Option<usize>,
    stage: Option<usize>,
    work_type: Option<usize>,
    responsible_area: Option<usize>,
    description: Option<usize>,
    contract_amount: Option<usize>,
    district: Option<usize>,
    neighborhood: Option<usize>,
    address: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    start_date: Option<usize>,
    estimated_end: Option<usize>,
    term_months: Option<usize>,
    progress: Option<usize>,
    contractor: Option<usize>,
    bidding_year: Option<usize>,
    contracting_type: Option<usize>,
    contract_number: Option<usize>,
    tax_id: Option<usize>,
    labor: Option<usize>,
    commitment: Option<usize>,
    featured: Option<usize>,
    public_choice: Option<usize>,
    file_number: Option<usize>,
    financing: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &ByteRecord) -> Self {
        let position = |wanted: &str| {
            headers.iter().position(|h| {
                String::from_utf8_lossy(h).trim().eq_ignore_ascii_case(wanted)
            })
        };
        ColumnIndex {
            environment: position("entorno"),
            name: position("nombre"),
            stage: position("etapa"),
            work_type: position("tipo"),
            responsible_area: position("area_responsable"),
            description: position("descripcion"),
            contract_amount: position("monto_contrato"),
            district: position("comuna"),
            neighborhood: position("barrio"),
            address: position("direccion"),
            latitude: position("lat"),
            longitude: position("lng"),
            start_date: position("fecha_inicio"),
            estimated_end: position("fecha_fin_inicial"),
            term_months: position("plazo_meses"),
            progress: position("porcentaje_avance"),
            contractor: position("licitacion_oferta_empresa"),
            bidding_year: position("licitacion_anio"),
            contracting_type: position("contratacion_tipo"),
            contract_number: position("nro_contratacion"),
            tax_id: position("cuit_contratista"),
            labor: position("mano_obra"),
            commitment: position("compromiso"),
            featured: position("destacada"),
            public_choice: position("ba_elige"),
            file_number: position("expediente-numero"),
            financing: position("financiamiento"),
        }
    }
}

/// Decode one cell; whitespace-only cells become `None`. Lossy UTF-8
/// decoding tolerates the export's latin1 accents.
fn cell(record: &ByteRecord, index: Option<usize>) -> Option<String> {
    let raw = record.get(index?)?;
    let text = String::from_utf8_lossy(raw).trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

/// Read the export and produce pre-normalized rows for the loader.
pub fn extract_rows(path: &Path) -> Result<Vec<WorkRow>, WorksError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)?;
    let columns = ColumnIndex::from_headers(&reader.byte_headers()?.clone());

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        rows.push(WorkRow {
            environment: cell(&record, columns.environment),
            name: cell(&record, columns.name),
            stage: cell(&record, columns.stage),
            work_type: cell(&record, columns.work_type),
            responsible_area: cell(&record, columns.responsible_area),
            description: cell(&record, columns.description),
            contract_amount: cell(&record, columns.contract_amount),
            district: cell(&record, columns.district),
            neighborhood: cell(&record, columns.neighborhood),
            address: cell(&record, columns.address),
            latitude: cell(&record, columns.latitude),
            longitude: cell(&record, columns.longitude),
            start_date: cell(&record, columns.start_date),
            estimated_end: cell(&record, columns.estimated_end),
            term_months: cell(&record, columns.term_months),
            progress: cell(&record, columns.progress),
            contractor: cell(&record, columns.contractor),
            bidding_year: cell(&record, columns.bidding_year),
            contracting_type: cell(&record, columns.contracting_type),
            contract_number: cell(&record, columns.contract_number),
            tax_id: cell(&record, columns.tax_id),
            labor: cell(&record, columns.labor),
            commitment: cell(&record, columns.commitment),
            featured: cell(&record, columns.featured),
            public_choice: cell(&record, columns.public_choice),
            file_number: cell(&record, columns.file_number),
            financing: cell(&record, columns.financing),
        });
    }
    Ok(rows)
}
