use crate::config::AvatarsConfig;
use crate::error::{AppError, AppResult};
use sha2::{Digest, Sha256};
use url::Url;

/// Builds placeholder avatar URLs on the configured third-party image service.
///
/// The service is addressed as `<base>/<size>?u=<seed>`; the same seed always
/// yields the same picture, so seeds derived from the email are stable across
/// restarts while salted seeds give a user a fresh picture.
#[derive(Clone, Debug)]
pub struct AvatarService {
    base_url: Url,
    size: u32,
}

impl AvatarService {
    pub fn new(config: &AvatarsConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.service_url)
            .map_err(|e| AppError::Config(format!("Invalid AVATAR_SERVICE_URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(
                "AVATAR_SERVICE_URL must be an absolute http(s) URL".to_string(),
            ));
        }
        if config.size == 0 {
            return Err(AppError::Config("AVATAR_SIZE must be > 0".to_string()));
        }
        Ok(Self {
            base_url,
            size: config.size,
        })
    }

    /// Deterministic placeholder for an email address.
    pub fn placeholder_for_email(&self, email: &str) -> String {
        self.build(&seed_for(email, None))
    }

    /// Placeholder that differs from the email default, used when reassigning.
    pub fn reassigned_for_email(&self, email: &str, salt: &str) -> String {
        self.build(&seed_for(email, Some(salt)))
    }

    fn build(&self, seed: &str) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.size.to_string());
        }
        url.query_pairs_mut().clear().append_pair("u", seed);
        url.to_string()
    }
}

fn seed_for(email: &str, salt: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    if let Some(salt) = salt {
        hasher.update(b":");
        hasher.update(salt.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AvatarService {
        AvatarService::new(&AvatarsConfig {
            service_url: "https://i.pravatar.cc".to_string(),
            size: 150,
        })
        .unwrap()
    }

    #[test]
    fn same_email_same_avatar() {
        let s = service();
        let a = s.placeholder_for_email("Ada@Lab.org");
        let b = s.placeholder_for_email(" ada@lab.org ");
        assert_eq!(a, b);
        assert!(a.starts_with("https://i.pravatar.cc/150?u="));
        assert_ne!(a, s.placeholder_for_email("grace@lab.org"));
    }

    #[test]
    fn salt_changes_avatar() {
        let s = service();
        let base = s.placeholder_for_email("ada@lab.org");
        let one = s.reassigned_for_email("ada@lab.org", "2025-01");
        let two = s.reassigned_for_email("ada@lab.org", "2025-02");
        assert_ne!(base, one);
        assert_ne!(one, two);
    }

    #[test]
    fn base_path_is_kept() {
        let s = AvatarService::new(&AvatarsConfig {
            service_url: "https://img.example.com/avatars/".to_string(),
            size: 64,
        })
        .unwrap();
        let url = s.placeholder_for_email("x@y.z");
        assert!(url.starts_with("https://img.example.com/avatars/64?u="));
    }

    #[test]
    fn rejects_bad_config() {
        assert!(AvatarService::new(&AvatarsConfig {
            service_url: "not a url".to_string(),
            size: 150,
        })
        .is_err());
        assert!(AvatarService::new(&AvatarsConfig {
            service_url: "https://i.pravatar.cc".to_string(),
            size: 0,
        })
        .is_err());
    }
}
