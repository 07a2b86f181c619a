//! Schema introspection module.
//!
//! This module reads PostgreSQL system catalogs to describe schemas, tables,
//! columns, indexes and foreign keys.
//!
//! # Architecture
//!
//! SQL queries are organized in the `queries` submodule. Every query binds
//! the table and schema names as parameters and returns rows in a fixed
//! order (names sorted, columns by ordinal position) so that output is
//! reproducible.

use crate::error::DbResult;
use crate::models::{ColumnInfo, ForeignKeyInfo, IndexInfo};
use sqlx::{PgPool, Row};
use tracing::debug;

// =============================================================================
// SQL Query Templates
// =============================================================================

mod queries {
    /// Every namespace except the internal `pg_*` ones (`pg_catalog`,
    /// `pg_toast`, temp schemas). `information_schema` is included.
    pub const LIST_SCHEMAS: &str = r#"
        SELECT nspname::text AS schema_name
        FROM pg_namespace
        WHERE nspname NOT LIKE 'pg\_%'
        ORDER BY nspname
        "#;

    /// Ordinary and partitioned tables; views, sequences and foreign tables
    /// are not listed.
    pub const LIST_TABLES: &str = r#"
        SELECT c.relname::text AS table_name
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1
        AND c.relkind IN ('r', 'p')
        ORDER BY c.relname
        "#;

    pub const LIST_COLUMNS: &str = r#"
        SELECT
            a.attname::text AS column_name,
            format_type(a.atttypid, a.atttypmod) AS column_type,
            NOT a.attnotnull AS is_nullable,
            pg_get_expr(d.adbin, d.adrelid) AS column_default,
            COALESCE(
                a.attidentity <> '' OR pg_get_expr(d.adbin, d.adrelid) LIKE 'nextval(%',
                false
            ) AS is_autoincrement,
            col_description(a.attrelid, a.attnum) AS column_comment
        FROM pg_attribute a
        JOIN pg_class t ON t.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
        WHERE t.relname = $1
        AND n.nspname = $2
        AND a.attnum > 0
        AND NOT a.attisdropped
        ORDER BY a.attnum
        "#;

    /// Secondary indexes; the index backing the primary key is excluded.
    pub const LIST_INDEXES: &str = r#"
        SELECT
            i.relname::text AS index_name,
            ARRAY(
                SELECT a.attname::text
                FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
                JOIN pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = k.attnum
                ORDER BY k.ord
            ) AS column_names,
            ix.indisunique AS is_unique
        FROM pg_index ix
        JOIN pg_class i ON i.oid = ix.indexrelid
        JOIN pg_class t ON t.oid = ix.indrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        WHERE t.relname = $1
        AND n.nspname = $2
        AND NOT ix.indisprimary
        ORDER BY i.relname
        "#;

    pub const LIST_FOREIGN_KEYS: &str = r#"
        SELECT
            c.conname::text AS constraint_name,
            ARRAY(
                SELECT a.attname::text
                FROM unnest(c.conkey) WITH ORDINALITY AS k(attnum, ord)
                JOIN pg_attribute a ON a.attrelid = c.conrelid AND a.attnum = k.attnum
                ORDER BY k.ord
            ) AS constrained_columns,
            rn.nspname::text AS referred_schema,
            rt.relname::text AS referred_table,
            ARRAY(
                SELECT a.attname::text
                FROM unnest(c.confkey) WITH ORDINALITY AS k(attnum, ord)
                JOIN pg_attribute a ON a.attrelid = c.confrelid AND a.attnum = k.attnum
                ORDER BY k.ord
            ) AS referred_columns
        FROM pg_constraint c
        JOIN pg_class t ON t.oid = c.conrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        JOIN pg_class rt ON rt.oid = c.confrelid
        JOIN pg_namespace rn ON rn.oid = rt.relnamespace
        WHERE c.contype = 'f'
        AND t.relname = $1
        AND n.nspname = $2
        ORDER BY c.conname
        "#;
}

/// Schema inspector for catalog introspection.
pub struct SchemaInspector;

impl SchemaInspector {
    /// List all user-visible schemas.
    pub async fn list_schemas(pool: &PgPool) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(queries::LIST_SCHEMAS)
            .fetch_all(pool)
            .await?;

        debug!(count = names.len(), "Listed schemas");
        Ok(names)
    }

    /// List all tables in a schema.
    pub async fn list_tables(pool: &PgPool, schema: &str) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(queries::LIST_TABLES)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        debug!(count = names.len(), schema = schema, "Listed tables");
        Ok(names)
    }

    /// List the columns of a table in ordinal order.
    pub async fn list_columns(
        pool: &PgPool,
        table: &str,
        schema: &str,
    ) -> DbResult<Vec<ColumnInfo>> {
        let rows = sqlx::query(queries::LIST_COLUMNS)
            .bind(table)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        let columns = rows
            .iter()
            .map(|row| -> DbResult<ColumnInfo> {
                let name: String = row.try_get("column_name")?;
                let column_type: String = row.try_get("column_type")?;
                let nullable: bool = row.try_get("is_nullable")?;
                let autoincrement: bool = row.try_get("is_autoincrement")?;
                let default_value: Option<String> = row.try_get("column_default")?;
                let comment: Option<String> = row.try_get("column_comment")?;

                let mut col = ColumnInfo::new(name, column_type, nullable)
                    .with_autoincrement(autoincrement);
                if let Some(def) = default_value {
                    col = col.with_default(def);
                }
                if let Some(c) = comment.filter(|c| !c.is_empty()) {
                    col = col.with_comment(c);
                }
                Ok(col)
            })
            .collect::<DbResult<Vec<_>>>()?;

        debug!(
            count = columns.len(),
            table = table,
            schema = schema,
            "Listed columns"
        );
        Ok(columns)
    }

    /// List the secondary indexes of a table, sorted by name.
    pub async fn list_indexes(
        pool: &PgPool,
        table: &str,
        schema: &str,
    ) -> DbResult<Vec<IndexInfo>> {
        let rows = sqlx::query(queries::LIST_INDEXES)
            .bind(table)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        let indexes = rows
            .iter()
            .map(|row| -> DbResult<IndexInfo> {
                Ok(IndexInfo::new(
                    row.try_get::<String, _>("index_name")?,
                    row.try_get::<Vec<String>, _>("column_names")?,
                    row.try_get::<bool, _>("is_unique")?,
                ))
            })
            .collect::<DbResult<Vec<_>>>()?;

        debug!(
            count = indexes.len(),
            table = table,
            schema = schema,
            "Listed indexes"
        );
        Ok(indexes)
    }

    /// List the foreign keys declared on a table, sorted by name.
    pub async fn list_foreign_keys(
        pool: &PgPool,
        table: &str,
        schema: &str,
    ) -> DbResult<Vec<ForeignKeyInfo>> {
        let rows = sqlx::query(queries::LIST_FOREIGN_KEYS)
            .bind(table)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        let foreign_keys = rows
            .iter()
            .map(|row| -> DbResult<ForeignKeyInfo> {
                Ok(ForeignKeyInfo::new(
                    row.try_get::<String, _>("constraint_name")?,
                    row.try_get::<Vec<String>, _>("constrained_columns")?,
                    row.try_get::<String, _>("referred_schema")?,
                    row.try_get::<String, _>("referred_table")?,
                    row.try_get::<Vec<String>, _>("referred_columns")?,
                ))
            })
            .collect::<DbResult<Vec<_>>>()?;

        debug!(
            count = foreign_keys.len(),
            table = table,
            schema = schema,
            "Listed foreign keys"
        );
        Ok(foreign_keys)
    }
}
