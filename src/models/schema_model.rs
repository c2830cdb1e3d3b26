//! models/schema_model.rs
//! Descripción estática de tablas, columnas y relaciones, más la
//! `Metadata` que sabe crear y borrar todo el esquema en orden.

use std::collections::HashMap;

use crate::errors::OrmError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub primary_key: bool,
    /// Expresión SQL que el servidor usa como DEFAULT.
    pub server_default: Option<&'static str>,
    /// Tabla referenciada (siempre contra su columna `id`).
    pub references: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Column {
            name,
            sql_type,
            primary_key: false,
            server_default: None,
            references: None,
        }
    }

    fn ddl(&self) -> String {
        let mut ddl = format!("{} {}", self.name, self.sql_type);
        if self.primary_key {
            ddl.push_str(" NOT NULL");
        }
        if let Some(default) = self.server_default {
            ddl.push_str(&format!(" DEFAULT {default}"));
        }
        ddl
    }
}

#[derive(Debug, PartialEq)]
pub struct Table {
    pub name: &'static str,
    /// Nombre del modelo que mapea la tabla (para mensajes y repr).
    pub model: &'static str,
    pub columns: &'static [Column],
    /// Si es true, los defaults del servidor se traen en el mismo INSERT.
    pub eager_defaults: bool,
}

impl Table {
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    pub fn references(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().filter_map(|c| c.references)
    }

    /// Columnas que el servidor rellena solo (defaults), sin contar la PK.
    pub fn server_default_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns
            .iter()
            .filter(|c| c.server_default.is_some() && !c.primary_key)
            .map(|c| c.name)
    }

    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(Column::ddl).collect();

        let pks: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name)
            .collect();
        if !pks.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", pks.join(", ")));
        }

        for column in self.columns {
            if let Some(target) = column.references {
                parts.push(format!(
                    "FOREIGN KEY({}) REFERENCES {} (id)",
                    column.name, target
                ));
            }
        }

        format!("CREATE TABLE {} ({})", self.name, parts.join(", "))
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }
}

/// Relación many-to-one: `local_column` apunta a `target.id`.
#[derive(Debug)]
pub struct Relationship {
    pub name: &'static str,
    pub target: &'static Table,
    pub local_column: &'static str,
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Conjunto de tablas registradas.
#[derive(Debug, Default, Clone)]
pub struct Metadata {
    tables: Vec<&'static Table>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, table: &'static Table) -> Self {
        if !self.tables.iter().any(|t| t.name == table.name) {
            self.tables.push(table);
        }
        self
    }

    pub fn table(&self, name: &str) -> Option<&'static Table> {
        self.tables.iter().copied().find(|t| t.name == name)
    }

    pub fn tables(&self) -> &[&'static Table] {
        &self.tables
    }

    /// Tablas ordenadas de modo que toda tabla referenciada aparezca
    /// antes que quien la referencia. Entre tablas independientes se
    /// respeta el orden de registro.
    pub fn sorted_tables(&self) -> Result<Vec<&'static Table>, OrmError> {
        let mut marks: HashMap<&'static str, Mark> = HashMap::new();
        let mut ordered = Vec::with_capacity(self.tables.len());
        for &table in &self.tables {
            self.visit(table, &mut marks, &mut ordered)?;
        }
        Ok(ordered)
    }

    fn visit(
        &self,
        table: &'static Table,
        marks: &mut HashMap<&'static str, Mark>,
        ordered: &mut Vec<&'static Table>,
    ) -> Result<(), OrmError> {
        match marks.get(table.name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(OrmError::DependencyCycle { table: table.name }),
            None => {}
        }

        marks.insert(table.name, Mark::Visiting);
        for referenced in table.references() {
            // auto-referencia: no impone orden
            if referenced == table.name {
                continue;
            }
            let dependency = self.table(referenced).ok_or(OrmError::UnknownTable {
                table: table.name,
                references: referenced,
            })?;
            self.visit(dependency, marks, ordered)?;
        }
        marks.insert(table.name, Mark::Done);
        ordered.push(table);
        Ok(())
    }

    pub fn create_all_statements(&self) -> Result<Vec<String>, OrmError> {
        Ok(self
            .sorted_tables()?
            .into_iter()
            .map(Table::create_sql)
            .collect())
    }

    pub fn drop_all_statements(&self) -> Result<Vec<String>, OrmError> {
        Ok(self
            .sorted_tables()?
            .into_iter()
            .rev()
            .map(Table::drop_sql)
            .collect())
    }
}
