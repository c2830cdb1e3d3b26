//! models/attribute_model.rs
//! Estado de carga de cada atributo mapeado y su representación textual.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::errors::OrmError;

/// Marcador que se muestra en lugar de un valor no cargado.
pub const NOT_LOADED: &str = "<NOT_LOADED>";

/// Un atributo de una instancia: o se conoce su valor, o no se cargó.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Attr<T> {
    Loaded(T),
    #[default]
    NotLoaded,
}

impl<T> Attr<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Attr::Loaded(_))
    }

    /// Acceso explícito. Nunca hace I/O: si el valor no está, falla.
    pub fn get(&self, model: &'static str, attribute: &'static str) -> Result<&T, OrmError> {
        match self {
            Attr::Loaded(value) => Ok(value),
            Attr::NotLoaded => Err(OrmError::NotLoaded { model, attribute }),
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Attr::Loaded(value) => Some(value),
            Attr::NotLoaded => None,
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Attr::Loaded(value) => Some(value),
            Attr::NotLoaded => None,
        }
    }
}

impl<T> From<T> for Attr<T> {
    fn from(value: T) -> Self {
        Attr::Loaded(value)
    }
}

/// Representación al estilo `repr`: strings entre comillas simples,
/// valores ausentes como `None`.
pub trait Repr {
    fn repr(&self) -> String;
}

impl Repr for i32 {
    fn repr(&self) -> String {
        self.to_string()
    }
}

/// Comillas simples, salvo que el texto tenga `'` y ningún `"`.
impl Repr for String {
    fn repr(&self) -> String {
        let quote = if self.contains('\'') && !self.contains('"') {
            '"'
        } else {
            '\''
        };
        let mut repr = String::with_capacity(self.len() + 2);
        repr.push(quote);
        for c in self.chars() {
            match c {
                '\\' => repr.push_str("\\\\"),
                '\n' => repr.push_str("\\n"),
                '\r' => repr.push_str("\\r"),
                '\t' => repr.push_str("\\t"),
                c if c == quote => {
                    repr.push('\\');
                    repr.push(c);
                }
                c => repr.push(c),
            }
        }
        repr.push(quote);
        repr
    }
}

/// `datetime.datetime(Y, M, D, h, m[, s[, µs]])`: los segundos y los
/// microsegundos en cero se omiten.
impl Repr for NaiveDateTime {
    fn repr(&self) -> String {
        let mut parts = vec![
            self.year().to_string(),
            self.month().to_string(),
            self.day().to_string(),
            self.hour().to_string(),
            self.minute().to_string(),
        ];
        let micros = self.nanosecond() / 1_000;
        if self.second() != 0 || micros != 0 {
            parts.push(self.second().to_string());
        }
        if micros != 0 {
            parts.push(micros.to_string());
        }
        format!("datetime.datetime({})", parts.join(", "))
    }
}

impl<T: Repr> Repr for Option<T> {
    fn repr(&self) -> String {
        match self {
            Some(value) => value.repr(),
            None => "None".to_string(),
        }
    }
}

impl<T: Repr> Repr for Attr<T> {
    fn repr(&self) -> String {
        match self {
            Attr::Loaded(value) => value.repr(),
            Attr::NotLoaded => NOT_LOADED.to_string(),
        }
    }
}

/// Arma `Modelo(campo=valor, ...)` a partir de pares ya representados.
pub fn format_repr(model: &str, fields: &[(&str, String)]) -> String {
    let formatted = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{model}({formatted})")
}
