use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::image::ImageUpload;

/// Trims input and treats blank strings as missing.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ======================= AUTH =======================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required(message = "The name field is required."))]
    pub name: Option<String>,
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "The password field is required."),
        length(min = 8, message = "The password must be at least 8 characters.")
    )]
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: present(self.name),
            email: present(self.email),
            // passwords are taken verbatim
            password: self.password.filter(|p| !p.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

// ======================= POSTS =======================

/// Payload of both `POST /posts` and `PATCH /posts/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct PostBodyRequest {
    #[validate(required(message = "The body field is required."))]
    pub body: Option<String>,
}

impl PostBodyRequest {
    pub fn normalized(self) -> Self {
        Self {
            body: present(self.body),
        }
    }
}

// ======================= IMAGES =======================

/// Raw multipart fields of an image request.
#[derive(Debug, Default)]
pub struct ImageFormFields {
    pub image: Option<ImageUpload>,
    pub body: Option<String>,
}

#[derive(Debug, Validate)]
pub struct StoreImageForm {
    #[validate(required(message = "The image field is required."))]
    pub image: Option<ImageUpload>,
    #[validate(required(message = "The body field is required."))]
    pub body: Option<String>,
}

#[derive(Debug, Validate)]
pub struct UpdateImageForm {
    #[validate(required(message = "The image field is required."))]
    pub image: Option<ImageUpload>,
    pub body: Option<String>,
}

impl From<ImageFormFields> for StoreImageForm {
    fn from(fields: ImageFormFields) -> Self {
        Self {
            image: fields.image,
            body: present(fields.body),
        }
    }
}

impl From<ImageFormFields> for UpdateImageForm {
    fn from(fields: ImageFormFields) -> Self {
        Self {
            image: fields.image,
            body: present(fields.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_fails_validation() {
        let request = PostBodyRequest {
            body: Some("   ".into()),
        }
        .normalized();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("body"));
    }

    #[test]
    fn body_is_trimmed() {
        let request = PostBodyRequest {
            body: Some("  hello \n".into()),
        }
        .normalized();

        assert!(request.validate().is_ok());
        assert_eq!(request.body.as_deref(), Some("hello"));
    }

    #[test]
    fn register_checks_email_and_password() {
        let request = RegisterRequest {
            name: Some("Jane".into()),
            email: Some("not-an-email".into()),
            password: Some("short".into()),
        }
        .normalized();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn update_image_form_allows_missing_body() {
        let form = UpdateImageForm::from(ImageFormFields {
            image: Some(ImageUpload {
                file_name: Some("a.png".into()),
                bytes: vec![1, 2, 3],
            }),
            body: None,
        });
        assert!(form.validate().is_ok());

        let store = StoreImageForm::from(ImageFormFields {
            image: None,
            body: Some("caption".into()),
        });
        let errors = store.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("image"));
    }

    #[test]
    fn store_image_form_accepts_file_and_caption() {
        let form = StoreImageForm::from(ImageFormFields {
            image: Some(ImageUpload {
                file_name: Some("cat.jpg".into()),
                bytes: vec![0xff, 0xd8, 0xff],
            }),
            body: Some("  my cat ".into()),
        });

        assert!(form.validate().is_ok());
        assert_eq!(form.body.as_deref(), Some("my cat"));
        let upload = serde_json::to_value(form.image.as_ref().unwrap()).unwrap();
        assert_eq!(upload, serde_json::json!({ "file_name": "cat.jpg" }));
    }
}
