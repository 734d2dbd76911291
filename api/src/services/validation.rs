//! Input validation for profile submissions.
//!
//! Free-text fields are trimmed; empty optional fields are stored as null.
//! Limits:
//! - name: 1-64 characters
//! - bio: up to 500 characters
//! - social handles: up to 39 characters of `[A-Za-z0-9_.-]`, a leading `@` is dropped
//! - URLs: `http://` or `https://`, up to 2048 characters
//! - projects: up to 20, each with a 1-100 character title

use crate::db::repositories::ProfileFields;
use crate::error::{ApiError, ApiResult};
use crate::eth::{parse_address, Address};
use crate::models::{Project, ProfileRequest};

pub const MAX_NAME_LENGTH: usize = 64;
pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_HANDLE_LENGTH: usize = 39;
pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_PROJECTS: usize = 20;
pub const MAX_PROJECT_TITLE_LENGTH: usize = 100;
pub const MAX_PROJECT_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum size of a support message in bytes
pub const MAX_SUPPORT_MESSAGE_BYTES: usize = 1024;

/// Validates a profile submission. The address is checked first.
pub fn profile_fields(request: ProfileRequest) -> ApiResult<(Address, ProfileFields)> {
    let address = parse_address(&request.wallet_address)?;

    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(invalid("name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }

    let bio = request.bio.trim().to_string();
    if bio.chars().count() > MAX_BIO_LENGTH {
        return Err(invalid(format!(
            "bio must be at most {} characters",
            MAX_BIO_LENGTH
        )));
    }

    if request.projects.len() > MAX_PROJECTS {
        return Err(invalid(format!("at most {} projects allowed", MAX_PROJECTS)));
    }
    let projects = request
        .projects
        .into_iter()
        .map(project)
        .collect::<ApiResult<Vec<_>>>()?;
    let projects =
        serde_json::to_value(projects).map_err(|e| ApiError::InternalError(e.to_string()))?;

    let fields = ProfileFields {
        name,
        bio,
        avatar_url: url("avatarUrl", request.avatar_url)?,
        farcaster_handle: handle("farcasterHandle", request.farcaster_handle)?,
        github_handle: handle("githubHandle", request.github_handle)?,
        twitter_handle: handle("twitterHandle", request.twitter_handle)?,
        blog_url: url("blogUrl", request.blog_url)?,
        projects,
    };

    Ok((address, fields))
}

/// Normalizes a social handle; `None` for missing or blank input
pub fn handle(field: &str, value: Option<String>) -> ApiResult<Option<String>> {
    let Some(value) = optional_text(value) else {
        return Ok(None);
    };
    let value = value.trim_start_matches('@').to_string();

    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if value.is_empty() || value.len() > MAX_HANDLE_LENGTH || !valid_chars {
        return Err(invalid(format!("{} is not a valid handle", field)));
    }
    Ok(Some(value))
}

fn url(field: &str, value: Option<String>) -> ApiResult<Option<String>> {
    let Some(value) = optional_text(value) else {
        return Ok(None);
    };
    let has_scheme = value.starts_with("https://") || value.starts_with("http://");
    if !has_scheme || value.len() > MAX_URL_LENGTH || value.contains(char::is_whitespace) {
        return Err(invalid(format!("{} must be an http(s) URL", field)));
    }
    Ok(Some(value))
}

fn project(item: Project) -> ApiResult<Project> {
    let title = item.title.trim().to_string();
    if title.is_empty() || title.chars().count() > MAX_PROJECT_TITLE_LENGTH {
        return Err(invalid(format!(
            "project title must be 1-{} characters",
            MAX_PROJECT_TITLE_LENGTH
        )));
    }
    let description = item.description.trim().to_string();
    if description.chars().count() > MAX_PROJECT_DESCRIPTION_LENGTH {
        return Err(invalid(format!(
            "project description must be at most {} characters",
            MAX_PROJECT_DESCRIPTION_LENGTH
        )));
    }

    Ok(Project {
        title,
        description,
        url: url("project url", item.url)?,
        image_url: url("project imageUrl", item.image_url)?,
    })
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(msg: impl Into<String>) -> ApiError {
    ApiError::InvalidRequest(msg.into())
}
