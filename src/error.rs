use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(
        "malformed explanation: feature_names has {names} entries, \
         feature_values has {values}, shap_values has {shap}"
    )]
    MalformedExplanation {
        names: usize,
        values: usize,
        shap: usize,
    },

    #[error("unsupported export format: {0} (expected csv, xlsx, or pdf)")]
    UnsupportedFormat(String),

    #[error("could not rasterize snapshot region: {0}")]
    Rasterization(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
