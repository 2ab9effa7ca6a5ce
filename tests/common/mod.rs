pub mod fixtures;
pub mod pdf_assertions;

use folio::{ExportDocument, ExportError, ExportOutcome, Exporter, MeasurementOracle, StackCapture};
use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Run one export on a fresh current-thread runtime.
pub fn run_export<O: MeasurementOracle>(
    exporter: &Exporter,
    oracle: &mut O,
    document: ExportDocument,
) -> Result<ExportOutcome, ExportError> {
    tokio::runtime::Builder::new_current_thread()
        .build()?
        .block_on(exporter.export(oracle, &StackCapture, document))
}

/// Run an export that is expected to produce a document, and parse it.
pub fn export_pdf<O: MeasurementOracle>(
    exporter: &Exporter,
    oracle: &mut O,
    document: ExportDocument,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    match run_export(exporter, oracle, document)? {
        ExportOutcome::Document(artifact) => GeneratedPdf::from_bytes(artifact.bytes),
        ExportOutcome::Empty => Err("export produced no document".into()),
    }
}
