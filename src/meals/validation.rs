use crate::error::FieldError;

/// Checks the new-meal form. Inputs are expected already trimmed.
pub fn validate_new_meal(titulo: &str, descricao: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if titulo.is_empty() {
        errors.push(FieldError::new("titulo", "Título obrigatório"));
    }
    if descricao.is_empty() {
        errors.push(FieldError::new("descricao", "Descrição obrigatória"));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_fields_required() {
        assert!(validate_new_meal("Almoço", "Salada").is_empty());
        let fields: Vec<_> = validate_new_meal("", "")
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["titulo", "descricao"]);
    }
}
