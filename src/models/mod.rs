pub mod post;
pub mod profile;
pub mod user;

pub use post::{Comment, CommentRemoveError, Like, LikeError, Post};
pub use profile::{parse_skills, Education, Experience, Profile, SocialLinks};
pub use user::User;
