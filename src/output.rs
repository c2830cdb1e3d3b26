//! output.rs
//! Salida de las demos: divisores con etiqueta y un transcript que se
//! imprime en stdout (CLI) o se acumula para devolverlo por HTTP.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};

/// Centra `| label |` en una línea de `=` de `width` caracteres.
/// El relleno sobrante va a la derecha; una etiqueta más ancha que
/// `width` se devuelve sin relleno.
pub fn format_divider(label: &str, width: usize) -> String {
    let label = if label.is_empty() {
        String::new()
    } else {
        format!("| {label} |")
    };
    format!("{label:=^width$}")
}

#[derive(Clone, Debug)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<String>>>,
    to_stdout: bool,
    width: usize,
}

impl Transcript {
    /// Imprime cada línea en cuanto llega (y también la guarda).
    pub fn stdout(width: usize) -> Self {
        Transcript {
            lines: Arc::new(Mutex::new(Vec::new())),
            to_stdout: true,
            width,
        }
    }

    pub fn buffered(width: usize) -> Self {
        Transcript {
            lines: Arc::new(Mutex::new(Vec::new())),
            to_stdout: false,
            width,
        }
    }

    pub fn line(&self, line: impl Into<String>) {
        let line = line.into();
        if self.to_stdout {
            println!("{line}");
        }
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }

    pub fn divider(&self, label: &str) {
        self.line(format_divider(label, self.width));
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Corre `future` enmarcado entre divisores y muestra el resultado.
pub async fn execute_verbosely<F>(
    transcript: &Transcript,
    label: &str,
    future: F,
) -> Result<Option<String>>
where
    F: Future<Output = Result<Option<String>>>,
{
    transcript.divider(&format!("Start Execution of '{label}'"));
    let result = future
        .await
        .with_context(|| format!("La demo '{label}' falló"))?;
    transcript.divider("Result");
    transcript.line(result.as_deref().unwrap_or("(no result)"));
    transcript.divider("End");
    transcript.line("");
    transcript.line("");
    Ok(result)
}
