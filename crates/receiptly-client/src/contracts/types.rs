use serde::Serialize;

use crate::receipts::Receipt;

#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptSummary {
    pub id: String,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub date: String,
    pub total: Option<String>,
    pub has_pdf: bool,
}

impl From<&Receipt> for ReceiptSummary {
    fn from(receipt: &Receipt) -> Self {
        Self {
            id: receipt.id.clone(),
            sender_name: receipt.sender_name.clone(),
            sender_email: receipt.sender_email.clone(),
            date: receipt.date.clone(),
            total: receipt.total.clone(),
            has_pdf: receipt.has_pdf,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub label: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub count: usize,
    pub receipts: Vec<ReceiptSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedData {
    pub count: usize,
    pub ids: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptListSummary {
    pub receipts_read: usize,
    pub matched: usize,
    pub sections: usize,
    pub empty_sections: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptListData {
    pub grouping: String,
    pub reference_day: String,
    pub query: String,
    pub hide_empty: bool,
    pub source: SourceInfo,
    pub summary: ReceiptListSummary,
    pub sections: Vec<SectionData>,
    pub skipped: SkippedData,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptDetail {
    pub id: String,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub date: String,
    pub date_iso: Option<String>,
    pub total: Option<String>,
    pub snippet: Option<String>,
    pub link: Option<String>,
    pub has_pdf: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptShowData {
    pub source: SourceInfo,
    pub receipt: ReceiptDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractSummary {
    pub messages_read: usize,
    pub receipts: usize,
    pub not_receipts: usize,
    pub missing_total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractData {
    pub source: SourceInfo,
    pub summary: ExtractSummary,
    pub receipts: Vec<Receipt>,
}
