use thiserror::Error;

use crate::crypto::TokenError;

/// Account fields that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
    Fullname,
    Phone,
    Dob,
}

impl Field {
    /// Request key of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::Fullname => "fullname",
            Field::Phone => "phone",
            Field::Dob => "dob",
        }
    }

    /// Label used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Password => "Mật khẩu",
            Field::Fullname => "Họ tên",
            Field::Phone => "Số điện thoại",
            Field::Dob => "Ngày sinh",
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{} không được để trống", .0.label())]
    MissingField(Field),

    #[error("{} không hợp lệ", .0.label())]
    InvalidFormat(Field),

    #[error("Mật khẩu phải có ít nhất 6 ký tự, gồm cả chữ và số")]
    WeakPassword,

    #[error("Email đã tồn tại")]
    DuplicateEmail,

    #[error("Thông tin đăng nhập không đúng")]
    InvalidCredentials,

    #[error("User không tồn tại")]
    NotFound,

    #[error("Lỗi cơ sở dữ liệu: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Lỗi mã hóa mật khẩu: {0}")]
    Hashing(String),

    #[error("Không tạo được token: {0}")]
    Token(#[from] TokenError),
}

impl AccountError {
    /// The field a validation failure refers to, if any
    pub fn field(&self) -> Option<Field> {
        match self {
            AccountError::MissingField(f) | AccountError::InvalidFormat(f) => Some(*f),
            AccountError::WeakPassword => Some(Field::Password),
            _ => None,
        }
    }
}
