pub mod document;
pub mod webdriver;

use crate::error::RenderError;
use crate::results::CrawlResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Turns an HTML document into PDF bytes
#[async_trait]
pub trait PdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Files written for one compiled crawl
#[derive(Debug, Clone)]
pub struct CompiledArchive {
    pub pdf_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub pages: usize,
}

/// Writes a crawl result to `<output_dir>/<uuid>.pdf`
#[derive(Debug, Clone)]
pub struct PdfCompiler {
    output_dir: PathBuf,
    write_json: bool,
}

impl PdfCompiler {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            write_json: false,
        }
    }

    /// Also write the page records as `<uuid>.json`
    pub fn with_json_export(mut self, enabled: bool) -> Self {
        self.write_json = enabled;
        self
    }

    /// Renders every record into one PDF.
    ///
    /// Any failure aborts the compile and leaves no PDF behind.
    pub async fn compile<R: PdfRenderer + ?Sized>(
        &self,
        result: CrawlResult,
        renderer: &R,
    ) -> Result<CompiledArchive, RenderError> {
        let html = document::build(&result.records)?;
        ::log::debug!(
            "Rendering {} pages ({} bytes of HTML)",
            result.len(),
            html.len()
        );

        let pdf = renderer.render(&html).await?;
        if !pdf.starts_with(b"%PDF") {
            return Err(RenderError::Engine(
                "renderer did not return a PDF document".to_string(),
            ));
        }

        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| RenderError::Io {
                path: self.output_dir.clone(),
                source,
            })?;

        let stem = Uuid::new_v4().to_string();
        self.write_archive(&stem, &pdf, &result).await
    }

    /// Writes `<stem>.json` (when enabled) and then `<stem>.pdf`.
    ///
    /// The JSON file is removed again if the PDF cannot be written, so a failed
    /// compile leaves neither file behind.
    async fn write_archive(
        &self,
        stem: &str,
        pdf: &[u8],
        result: &CrawlResult,
    ) -> Result<CompiledArchive, RenderError> {
        let json_path = if self.write_json {
            let path = self.output_dir.join(format!("{stem}.json"));
            let json = serde_json::to_vec_pretty(&result.records)?;
            write_atomically(&path, &json).await?;
            Some(path)
        } else {
            None
        };

        let pdf_path = self.output_dir.join(format!("{stem}.pdf"));
        if let Err(e) = write_atomically(&pdf_path, pdf).await {
            if let Some(path) = &json_path {
                remove_quietly(path).await;
            }
            return Err(e);
        }

        ::log::info!("PDF file created at {}", pdf_path.display());
        if let Some(path) = &json_path {
            ::log::info!("JSON file created at {}", path.display());
        }

        Ok(CompiledArchive {
            pdf_path,
            json_path,
            pages: result.len(),
        })
    }
}

/// Writes to a `.part` sibling first so readers never see a truncated file
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let written = match fs::write(&partial, bytes).await {
        Ok(()) => fs::rename(&partial, path).await,
        Err(e) => Err(e),
    };

    if let Err(source) = written {
        remove_quietly(&partial).await;
        return Err(RenderError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// Best-effort cleanup after a failed write
async fn remove_quietly(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => ::log::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => ::log::warn!("Could not remove {}: {}", path.display(), e),
    }
}
