/// Database models
///
/// Each model owns its SQL. Queries use explicit column lists and bind
/// parameters, and every tenant-scoped query filters by `user_id` so a
/// caller can never read another tenant's rows.

pub mod analytics;
pub mod blog_post;
pub mod business_profile;
pub mod calendar_event;
pub mod notification;
pub mod oauth_state;
pub mod post;
pub mod social_account;
pub mod subscription;
pub mod user;

pub use analytics::{Analytics, RecordAnalytics};
pub use blog_post::{BlogPost, BlogPostFilter, CreateBlogPost};
pub use business_profile::{BusinessProfile, CreateBusinessProfile, UpdateBusinessProfile};
pub use calendar_event::{CalendarEvent, CreateCalendarEvent};
pub use notification::{EnqueueNotification, Notification, NotificationStatus};
pub use oauth_state::{CreateOAuthState, OAuthState};
pub use post::{CreatePost, Post, PostStatus, UpdatePost};
pub use social_account::{SocialAccount, UpsertSocialAccount};
pub use subscription::{CreateSubscription, Subscription};
pub use user::{CreateUser, User};
