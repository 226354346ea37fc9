use lazy_static::lazy_static;
use regex::Regex;

use crate::error::FieldError;

pub const MIN_PASSWORD_CHARS: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email é obrigatório"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Por favor, insira um email válido"));
    }
}

fn check_password(senha: &str, errors: &mut Vec<FieldError>) {
    if senha.is_empty() {
        errors.push(FieldError::new("senha", "Senha é obrigatória"));
    } else if senha.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(FieldError::new(
            "senha",
            format!("A senha precisa ter pelo menos {MIN_PASSWORD_CHARS} caracteres"),
        ));
    }
}

/// Checks a login form. `email` is expected already trimmed.
pub fn validate_login(email: &str, senha: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    check_password(senha, &mut errors);
    errors
}

/// Checks a registration form. `nome` and `email` are expected already trimmed.
pub fn validate_register(nome: &str, email: &str, senha: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if nome.is_empty() {
        errors.push(FieldError::new("nome", "Nome é obrigatório"));
    }
    check_email(email, &mut errors);
    check_password(senha, &mut errors);
    errors
}
