//! Profile handlers: own profile, public listings, experience/education,
//! account deletion cascade, and the GitHub repositories lookup.

use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{parse_skills, Education, Experience, Profile, SocialLinks, User};
use crate::services::github;
use crate::store;
use crate::store::collection::Collection;
use crate::validation::{required, validate, Rule};

const PROFILE_RULES: &[Rule] = &[
    required("status", "Status is required"),
    required("skills", "Skills is required"),
];

const EXPERIENCE_RULES: &[Rule] = &[
    required("title", "Title is required"),
    required("company", "Company is required"),
    required("from", "From date is required"),
];

const EDUCATION_RULES: &[Rule] = &[
    required("school", "School is required"),
    required("degree", "Degree is required"),
    required("fieldofstudy", "Field of study is required"),
    required("from", "From date is required"),
];

#[derive(Debug, Deserialize)]
struct ProfileBody {
    status: String,
    /// Comma-separated skills string
    skills: String,
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    githubusername: Option<String>,
    youtube: Option<String>,
    twitter: Option<String>,
    facebook: Option<String>,
    linkedin: Option<String>,
    instagram: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExperienceBody {
    title: String,
    company: String,
    location: Option<String>,
    from: String,
    to: Option<String>,
    #[serde(default)]
    current: bool,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EducationBody {
    school: String,
    degree: String,
    fieldofstudy: String,
    from: String,
    to: Option<String>,
    #[serde(default)]
    current: bool,
    description: Option<String>,
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|_| ApiError::bad_request("Invalid request body"))
}

async fn find_own_profile(
    profiles: &Collection<Profile>,
    user_id: Uuid,
) -> Result<Profile, ApiError> {
    profiles
        .find_one(json!({ "user": user_id }))
        .await?
        .ok_or_else(|| ApiError::bad_request("There is no profile for this user"))
}

/// Replace the profile's user ref with the referenced user's display fields,
/// via an explicit secondary lookup.
async fn with_user(profile: Profile, users: &Collection<User>) -> Result<Value, ApiError> {
    let user = users.find_by_id(profile.user).await?;
    let mut doc = serde_json::to_value(&profile)?;
    doc["user"] = match user {
        Some(user) => json!({ "id": user.id, "name": user.name, "avatar": user.avatar }),
        None => Value::Null,
    };
    Ok(doc)
}

/// Upsert semantics: required fields always overwrite, optional scalars only
/// overwrite when provided, social links are rebuilt wholesale.
fn apply_fields(profile: &mut Profile, body: ProfileBody) {
    profile.status = body.status;
    profile.skills = parse_skills(&body.skills);

    if body.company.is_some() {
        profile.company = body.company;
    }
    if body.website.is_some() {
        profile.website = body.website;
    }
    if body.location.is_some() {
        profile.location = body.location;
    }
    if body.bio.is_some() {
        profile.bio = body.bio;
    }
    if body.githubusername.is_some() {
        profile.githubusername = body.githubusername;
    }

    profile.social = SocialLinks {
        youtube: body.youtube,
        twitter: body.twitter,
        facebook: body.facebook,
        linkedin: body.linkedin,
        instagram: body.instagram,
    };
}

/// GET /api/profile/me
pub async fn get_my_profile(
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let profiles = store::profiles().await?;
    let profile = find_own_profile(&profiles, auth.user_id).await?;

    let users = store::users().await?;
    Ok(Json(with_user(profile, &users).await?))
}

/// POST /api/profile - create or update the caller's profile
pub async fn upsert_profile(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<Json<Profile>, ApiError> {
    validate(&body, PROFILE_RULES)?;
    let payload: ProfileBody = decode(body)?;

    let profiles = store::profiles().await?;

    // At most one profile per user: update in place when one exists
    match profiles.find_one(json!({ "user": auth.user_id })).await? {
        Some(mut profile) => {
            apply_fields(&mut profile, payload);
            profiles.update(profile.id, &profile).await?;
            Ok(Json(profile))
        }
        None => {
            let mut profile = Profile::new(auth.user_id, String::new(), Vec::new());
            apply_fields(&mut profile, payload);
            profiles.insert(profile.id, &profile).await?;
            Ok(Json(profile))
        }
    }
}

/// GET /api/profile - public listing with joined user display fields
pub async fn list_profiles() -> Result<Json<Vec<Value>>, ApiError> {
    let profiles = store::profiles().await?.find_all().await?;
    let users = store::users().await?;

    let mut joined = Vec::with_capacity(profiles.len());
    for profile in profiles {
        joined.push(with_user(profile, &users).await?);
    }
    Ok(Json(joined))
}

/// GET /api/profile/user/:user_id - public
pub async fn get_profile_by_user(Path(user_id): Path<String>) -> Result<Json<Value>, ApiError> {
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|_| ApiError::bad_request("Profile not found"))?;

    let profiles = store::profiles().await?;
    let profile = profiles
        .find_one(json!({ "user": user_id }))
        .await?
        .ok_or_else(|| ApiError::bad_request("Profile not found"))?;

    let users = store::users().await?;
    Ok(Json(with_user(profile, &users).await?))
}

/// DELETE /api/profile - delete the caller's posts, profile, and user record.
/// Posts and profile go first so the user record is never left referenced.
pub async fn delete_account(
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let filter = json!({ "user": auth.user_id });

    store::posts().await?.delete_many(filter.clone()).await?;
    store::profiles().await?.delete_many(filter).await?;
    store::users().await?.delete(auth.user_id).await?;

    Ok(Json(json!({ "msg": "User deleted" })))
}

/// PUT /api/profile/experience
pub async fn add_experience(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<Json<Profile>, ApiError> {
    validate(&body, EXPERIENCE_RULES)?;
    let payload: ExperienceBody = decode(body)?;

    let profiles = store::profiles().await?;
    let mut profile = find_own_profile(&profiles, auth.user_id).await?;

    profile.add_experience(Experience {
        id: Uuid::new_v4(),
        title: payload.title,
        company: payload.company,
        location: payload.location,
        from: payload.from,
        to: payload.to,
        current: payload.current,
        description: payload.description,
    });

    profiles.update(profile.id, &profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/experience/:exp_id
pub async fn remove_experience(
    Extension(auth): Extension<AuthUser>,
    Path(exp_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let exp_id = Uuid::parse_str(&exp_id)
        .map_err(|_| ApiError::not_found("Experience entry not found"))?;

    let profiles = store::profiles().await?;
    let mut profile = find_own_profile(&profiles, auth.user_id).await?;

    if !profile.remove_experience(exp_id) {
        return Err(ApiError::not_found("Experience entry not found"));
    }

    profiles.update(profile.id, &profile).await?;
    Ok(Json(profile))
}

/// PUT /api/profile/education
pub async fn add_education(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<Json<Profile>, ApiError> {
    validate(&body, EDUCATION_RULES)?;
    let payload: EducationBody = decode(body)?;

    let profiles = store::profiles().await?;
    let mut profile = find_own_profile(&profiles, auth.user_id).await?;

    profile.add_education(Education {
        id: Uuid::new_v4(),
        school: payload.school,
        degree: payload.degree,
        fieldofstudy: payload.fieldofstudy,
        from: payload.from,
        to: payload.to,
        current: payload.current,
        description: payload.description,
    });

    profiles.update(profile.id, &profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/education/:edu_id
pub async fn remove_education(
    Extension(auth): Extension<AuthUser>,
    Path(edu_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let edu_id = Uuid::parse_str(&edu_id)
        .map_err(|_| ApiError::not_found("Education entry not found"))?;

    let profiles = store::profiles().await?;
    let mut profile = find_own_profile(&profiles, auth.user_id).await?;

    if !profile.remove_education(edu_id) {
        return Err(ApiError::not_found("Education entry not found"));
    }

    profiles.update(profile.id, &profile).await?;
    Ok(Json(profile))
}

/// GET /api/profile/github/:username - public, delegates to the GitHub API
pub async fn github_repos(Path(username): Path<String>) -> Result<Json<Value>, ApiError> {
    let repos = github::user_repos(&username).await?;
    Ok(Json(repos))
}
