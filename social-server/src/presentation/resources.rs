//! JSON envelopes returned by the API.
//!
//! Every resource is `{ data: { type, <kind>_id, attributes }, links: { self } }`
//! and every collection is `{ data: [...], links: { self } }`. Links are
//! absolute URLs rooted at the configured application URL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::image::ImageView;
use crate::domain::post::PostView;
use crate::domain::user::User;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Relative rendering such as `"3 minutes ago"` or `"2 days from now"`.
pub fn diff_for_humans(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds();
    let (seconds, suffix) = if seconds < 0 {
        (-seconds, "from now")
    } else {
        (seconds, "ago")
    };

    let units = [
        ("year", 365 * DAY),
        ("month", 30 * DAY),
        ("week", 7 * DAY),
        ("day", DAY),
        ("hour", HOUR),
        ("minute", MINUTE),
    ];
    let (count, unit) = units
        .iter()
        .find(|(_, size)| seconds >= *size)
        .map(|(unit, size)| (seconds / size, *unit))
        .unwrap_or((seconds.max(1), "second"));
    // 360..365 days would otherwise read "12 months"
    let count = if unit == "month" { count.min(11) } else { count };

    let plural = if count == 1 { "" } else { "s" };
    format!("{} {}{} {}", count, unit, plural, suffix)
}

/// Per-request inputs shared by all transforms.
#[derive(Debug, Clone)]
pub struct ResourceContext {
    base_url: String,
    viewer_id: Uuid,
    now: DateTime<Utc>,
}

impl ResourceContext {
    pub fn new(base_url: &str, viewer_id: Uuid) -> Self {
        Self::at(base_url, viewer_id, Utc::now())
    }

    pub fn at(base_url: &str, viewer_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            viewer_id,
            now,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[derive(Debug, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
}

impl Links {
    fn to(ctx: &ResourceContext, path: &str) -> Self {
        Self {
            self_link: ctx.url(path),
        }
    }
}

// ======================= USERS =======================

#[derive(Debug, Serialize)]
pub struct UserResource {
    pub data: UserData,
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct UserData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub user_id: Uuid,
    pub attributes: UserAttributes,
}

#[derive(Debug, Serialize)]
pub struct UserAttributes {
    pub name: String,
}

impl UserResource {
    pub fn new(user: &User, ctx: &ResourceContext) -> Self {
        Self {
            data: UserData {
                kind: "users",
                user_id: user.id,
                attributes: UserAttributes {
                    name: user.name.clone(),
                },
            },
            links: Links::to(ctx, &format!("users/{}", user.id)),
        }
    }
}

// ======================= LIKES =======================

#[derive(Debug, Serialize)]
pub struct LikeResource {
    pub data: LikeData,
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct LikeData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub like_id: Uuid,
    pub attributes: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct LikeCollection {
    pub data: Vec<LikeResource>,
    pub like_count: usize,
    pub user_likes_post: bool,
    pub links: Links,
}

impl LikeCollection {
    pub fn new(post_id: Uuid, likers: &[User], ctx: &ResourceContext) -> Self {
        let data = likers
            .iter()
            .map(|user| LikeResource {
                data: LikeData {
                    kind: "likes",
                    like_id: user.id,
                    attributes: Vec::new(),
                },
                links: Links::to(ctx, &format!("posts/{}", post_id)),
            })
            .collect();

        Self {
            data,
            like_count: likers.len(),
            user_likes_post: likers.iter().any(|u| u.id == ctx.viewer_id),
            links: Links::to(ctx, "posts"),
        }
    }
}

// ======================= POSTS =======================

#[derive(Debug, Serialize)]
pub struct PostResource {
    pub data: PostData,
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct PostData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub post_id: Uuid,
    pub attributes: PostAttributes,
}

#[derive(Debug, Serialize)]
pub struct PostAttributes {
    pub posted_by: UserResource,
    pub likes: LikeCollection,
    pub body: String,
    pub posted_at: String,
}

impl PostResource {
    pub fn new(view: &PostView, ctx: &ResourceContext) -> Self {
        let post = &view.post;
        Self {
            data: PostData {
                kind: "posts",
                post_id: post.id,
                attributes: PostAttributes {
                    posted_by: UserResource::new(&view.author, ctx),
                    likes: LikeCollection::new(post.id, &view.likes, ctx),
                    body: post.body.clone(),
                    posted_at: diff_for_humans(post.created_at, ctx.now),
                },
            },
            links: Links::to(ctx, &format!("posts/{}", post.id)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostCollection {
    pub data: Vec<PostResource>,
    pub links: Links,
}

impl PostCollection {
    pub fn new(views: &[PostView], ctx: &ResourceContext) -> Self {
        Self {
            data: views.iter().map(|v| PostResource::new(v, ctx)).collect(),
            links: Links::to(ctx, "posts"),
        }
    }
}

// ======================= IMAGES =======================

#[derive(Debug, Serialize)]
pub struct ImageResource {
    pub data: ImageData,
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct ImageData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub image_id: Uuid,
    pub attributes: ImageAttributes,
}

#[derive(Debug, Serialize)]
pub struct ImageAttributes {
    pub posted_by: UserResource,
    pub body: String,
    /// Public URL of the stored file.
    pub image: String,
    pub posted_at: String,
}

impl ImageResource {
    pub fn new(view: &ImageView, ctx: &ResourceContext) -> Self {
        let image = &view.image;
        Self {
            data: ImageData {
                kind: "images",
                image_id: image.id,
                attributes: ImageAttributes {
                    posted_by: UserResource::new(&view.author, ctx),
                    body: image.body.clone(),
                    image: ctx.url(&format!("storage/{}", image.image)),
                    posted_at: diff_for_humans(image.created_at, ctx.now),
                },
            },
            links: Links::to(ctx, &format!("images/{}", image.id)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageCollection {
    pub data: Vec<ImageResource>,
    pub links: Links,
}

impl ImageCollection {
    pub fn new(views: &[ImageView], ctx: &ResourceContext) -> Self {
        Self {
            data: views.iter().map(|v| ImageResource::new(v, ctx)).collect(),
            links: Links::to(ctx, "images"),
        }
    }
}
