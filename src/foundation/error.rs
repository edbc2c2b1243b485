pub type DioramaResult<T> = Result<T, DioramaError>;

#[derive(thiserror::Error, Debug)]
pub enum DioramaError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("resolution error: {0}")]
    Resolution(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DioramaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            DioramaError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            DioramaError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(
            DioramaError::resolution("x")
                .to_string()
                .contains("resolution error:")
        );
        assert!(
            DioramaError::scene("x").to_string().contains("scene error:")
        );
        assert!(
            DioramaError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = DioramaError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
