//! Printable documents: the service order sheet and the general report.
//!
//! Both are laid out as fixed-width text, then served either as that text or
//! typeset onto A4 pages in a monospaced PDF font.

use std::fmt::Write;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::CompanyProfile;
use crate::errors::AppError;
use crate::models::service_order::ServiceOrderDetails;
use crate::services::report::GeneralReport;

const WIDTH: usize = 64;
const LABEL_WIDTH: usize = 22;

fn or_dash(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or("-")
}

fn money(amount: &Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

fn rule(out: &mut String) {
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
}

fn centered(out: &mut String, title: &str) {
    let len = title.chars().count();
    let pad = WIDTH.saturating_sub(len) / 2;
    let _ = writeln!(out, "{}{title}", " ".repeat(pad));
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{value}", format!("{label}:"));
}

fn company_header(out: &mut String, company: &CompanyProfile) {
    let _ = writeln!(out, "{}", company.name);
    let _ = writeln!(out, "{}", company.address);
    let _ = writeln!(out, "Tel: {}", company.phone);
    let _ = writeln!(out, "Email: {}", company.email);
    let _ = writeln!(out, "CNPJ: {}", company.tax_id);
    rule(out);
}

/// Service order sheet handed to the customer for signature.
pub fn render_order_sheet(company: &CompanyProfile, order: &ServiceOrderDetails) -> String {
    let mut out = String::new();
    company_header(&mut out, company);
    centered(&mut out, "Ordem de Serviço");
    out.push('\n');

    let vehicle = match (&order.vehicle_model, &order.vehicle_plate) {
        (Some(model), Some(plate)) => format!("{model} ({plate})"),
        (Some(model), None) => model.clone(),
        _ => "-".to_string(),
    };

    field(&mut out, "ID", &order.id.to_string());
    field(&mut out, "Cliente", or_dash(order.customer_name.as_deref()));
    field(&mut out, "Veículo", &vehicle);
    field(&mut out, "Data Entrada", &order.entry_date.format("%d/%m/%Y").to_string());
    field(&mut out, "Problema Cliente", or_dash(order.reported_problem.as_deref()));
    field(&mut out, "Diagnóstico", or_dash(order.diagnosis.as_deref()));
    field(&mut out, "Serviços Realizados", or_dash(order.services_performed.as_deref()));
    field(&mut out, "Valor (R$)", &money(&order.amount));
    field(&mut out, "Status", or_dash(Some(order.status.as_str())));

    out.push_str("\n\n\n");
    let _ = writeln!(out, "{:<34}{}", "_".repeat(30), "_".repeat(24));
    let _ = writeln!(out, "{:<34}{}", "Assinatura do Cliente", "Data");
    out
}

/// Printable version of the general report.
pub fn render_report(company: &CompanyProfile, report: &GeneralReport) -> String {
    let mut out = String::new();
    company_header(&mut out, company);
    centered(&mut out, "Relatório Geral");
    out.push('\n');

    field(&mut out, "Total de Ordens", &report.total_orders.to_string());
    field(&mut out, "Total de Clientes", &report.total_customers.to_string());
    field(&mut out, "Receita Total (R$)", &money(&report.revenue));
    out.push('\n');

    let _ = writeln!(out, "{:<LABEL_WIDTH$}Quantidade", "Status");
    rule(&mut out);
    for row in &report.by_status {
        let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", row.status, row.count);
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "Gerado em {}",
        report.generated_at.format("%d/%m/%Y %H:%M UTC")
    );
    out
}

/// Output format requested with `?format=`. PDF unless asked otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Pdf,
    Text,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    #[serde(default)]
    pub format: DocumentFormat,
}

/// A document ready to be sent, with its media type and file extension.
#[derive(Debug)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    pub extension: &'static str,
    pub body: Vec<u8>,
}

impl DocumentFormat {
    pub fn render(self, title: &str, text: String) -> Result<RenderedDocument, AppError> {
        match self {
            Self::Text => Ok(RenderedDocument {
                content_type: "text/plain; charset=utf-8",
                extension: "txt",
                body: text.into_bytes(),
            }),
            Self::Pdf => Ok(RenderedDocument {
                content_type: "application/pdf",
                extension: "pdf",
                body: text_to_pdf(title, &text)?,
            }),
        }
    }
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 17.0;
const FONT_SIZE_PT: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 4.5;

/// Typeset fixed-width text onto as many A4 pages as it needs.
pub fn text_to_pdf(title: &str, text: &str) -> Result<Vec<u8>, AppError> {
    let pdf_err = |e: printpdf::Error| AppError::Internal(format!("PDF rendering failed: {e}"));

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_err)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    for line in text.lines() {
        if y < MARGIN_MM {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        if !line.trim().is_empty() {
            layer.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
        }
        y -= LINE_HEIGHT_MM;
    }

    doc.save_to_bytes().map_err(pdf_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report::{build_report, StatusTotals};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn company() -> CompanyProfile {
        CompanyProfile {
            name: "Auto Center Teste".to_string(),
            tax_id: "12.345.678/0001-90".to_string(),
            phone: "(11) 4000-0000".to_string(),
            email: "contato@autocenter.test".to_string(),
            address: "Av. Brasil, 100".to_string(),
        }
    }

    fn order() -> ServiceOrderDetails {
        ServiceOrderDetails {
            id: Uuid::nil(),
            customer_id: Uuid::nil(),
            vehicle_id: Uuid::nil(),
            customer_name: Some("Carlos Lima".to_string()),
            vehicle_model: Some("Gol".to_string()),
            vehicle_plate: Some("ABC1D23".to_string()),
            entry_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            reported_problem: Some("Barulho no freio".to_string()),
            diagnosis: None,
            services_performed: Some("  ".to_string()),
            amount: Decimal::new(3505, 1),
            status: "Em Andamento".to_string(),
            created_at: None,
        }
    }

    fn line_for<'a>(doc: &'a str, label: &str) -> &'a str {
        doc.lines()
            .find(|l| l.starts_with(&format!("{label}:")))
            .unwrap()
    }

    #[test]
    fn order_sheet_has_header_and_fields() {
        let doc = render_order_sheet(&company(), &order());
        assert!(doc.starts_with("Auto Center Teste\n"));
        assert!(doc.contains("CNPJ: 12.345.678/0001-90"));
        assert!(doc.contains("Ordem de Serviço"));
        assert!(line_for(&doc, "Veículo").ends_with("Gol (ABC1D23)"));
        assert!(line_for(&doc, "Data Entrada").ends_with("05/03/2024"));
        assert!(line_for(&doc, "Valor (R$)").ends_with("350.50"));
        assert!(doc.contains("Assinatura do Cliente"));
    }

    #[test]
    fn missing_order_fields_print_as_dash() {
        let mut o = order();
        o.vehicle_model = None;
        o.customer_name = None;
        let doc = render_order_sheet(&company(), &o);
        assert!(line_for(&doc, "Diagnóstico").ends_with(" -"));
        assert!(line_for(&doc, "Serviços Realizados").ends_with(" -"));
        assert!(line_for(&doc, "Cliente").ends_with(" -"));
        assert!(line_for(&doc, "Veículo").ends_with(" -"));
    }

    #[test]
    fn report_document_lists_totals_and_statuses() {
        let rows = [StatusTotals {
            status: "Finalizada".to_string(),
            orders: 2,
            amount: Decimal::new(40000, 2),
        }];
        let generated = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let doc = render_report(&company(), &build_report(&rows, 3, generated));
        assert!(line_for(&doc, "Receita Total (R$)").ends_with("400.00"));
        assert!(line_for(&doc, "Total de Clientes").ends_with('3'));
        assert!(doc.lines().any(|l| l.starts_with("Cancelada") && l.ends_with('0')));
        assert!(doc.contains("Gerado em 01/06/2024 12:00 UTC"));
    }

    #[test]
    fn order_sheet_pdf_is_a_pdf() {
        let text = render_order_sheet(&company(), &order());
        let doc = DocumentFormat::default()
            .render("Ordem de Serviço", text)
            .unwrap();
        assert_eq!(doc.content_type, "application/pdf");
        assert_eq!(doc.extension, "pdf");
        assert!(doc.body.starts_with(b"%PDF"));
    }

    #[test]
    fn long_text_spills_onto_more_pages() {
        let short = text_to_pdf("t", "one line").unwrap();
        let long = text_to_pdf("t", &"linha\n".repeat(200)).unwrap();
        assert!(long.starts_with(b"%PDF"));
        assert!(long.len() > short.len());
    }

    #[test]
    fn text_format_keeps_plain_layout() {
        let text = render_order_sheet(&company(), &order());
        let doc = DocumentFormat::Text.render("x", text.clone()).unwrap();
        assert_eq!(doc.content_type, "text/plain; charset=utf-8");
        assert_eq!(doc.body, text.into_bytes());
    }

    #[test]
    fn format_query_defaults_to_pdf() {
        let q: DocumentQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.format, DocumentFormat::Pdf);
        let q: DocumentQuery = serde_json::from_str(r#"{"format":"text"}"#).unwrap();
        assert_eq!(q.format, DocumentFormat::Text);
    }
}
