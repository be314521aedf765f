// src/common/db_utils.rs

use crate::db::store::StoreError;

// ---
// Helpers de SQL dinâmico
// ---
// As coleções, colunas e projeções chegam como texto (como no cliente do banco
// hospedado), então todo identificador passa por aqui antes de entrar numa query.

/// Valida um identificador SQL simples (`[A-Za-z_][A-Za-z0-9_]*`) e devolve-o entre aspas.
pub(crate) fn quote_ident(ident: &str) -> Result<String, StoreError> {
    let mut chars = ident.chars();
    let valid_head = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);

    if !valid_head || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidIdentifier(ident.to_string()));
    }

    Ok(format!("\"{}\"", ident))
}

/// Converte uma projeção "id, name, price" (ou "*") numa lista de colunas seguras.
pub(crate) fn quote_projection(projection: Option<&str>) -> Result<String, StoreError> {
    let projection = projection.map(str::trim).unwrap_or("*");
    if projection.is_empty() || projection == "*" {
        return Ok("*".to_string());
    }

    let columns = projection
        .split(',')
        .map(|column| quote_ident(column.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(columns.join(", "))
}

/// Colunas presentes na projeção (None = todas).
pub(crate) fn projection_columns(projection: Option<&str>) -> Option<Vec<String>> {
    let projection = projection.map(str::trim)?;
    if projection.is_empty() || projection == "*" {
        return None;
    }
    Some(
        projection
            .split(',')
            .map(|column| column.trim().to_string())
            .filter(|column| !column.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_identifiers() {
        assert_eq!(quote_ident("order_items").unwrap(), "\"order_items\"");
        assert_eq!(quote_ident("_x1").unwrap(), "\"_x1\"");
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(quote_ident("orders; DROP TABLE orders").is_err());
        assert!(quote_ident("1abc").is_err());
        assert!(quote_ident("").is_err());
        assert!(quote_ident("name\"").is_err());
    }

    #[test]
    fn quotes_projection_lists() {
        assert_eq!(quote_projection(None).unwrap(), "*");
        assert_eq!(quote_projection(Some(" * ")).unwrap(), "*");
        assert_eq!(
            quote_projection(Some("id, total,created_at")).unwrap(),
            "\"id\", \"total\", \"created_at\""
        );
        assert!(quote_projection(Some("id, total::text")).is_err());
    }

    #[test]
    fn lists_projection_columns() {
        assert_eq!(projection_columns(Some("*")), None);
        assert_eq!(
            projection_columns(Some("id, name")),
            Some(vec!["id".to_string(), "name".to_string()])
        );
    }
}
