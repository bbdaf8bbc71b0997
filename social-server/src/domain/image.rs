use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::policy::Owned;
use crate::domain::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Image {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Caption.
    pub body: String,
    /// Path relative to the public storage root.
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Image {
    pub fn new(user_id: Uuid, body: String, image: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            body,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Owned for Image {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct ImageView {
    pub image: Image,
    pub author: User,
}

/// Raw file received from a client, not yet persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}
