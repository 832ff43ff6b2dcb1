use trellis_core::{TrellisError, TrellisResult};

/// Puts a card or attachment URL on the system clipboard.
pub fn copy_url(url: &str) -> TrellisResult<()> {
    if url.trim().is_empty() {
        return Err(TrellisError::Validation("nothing to copy".to_string()));
    }
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| TrellisError::Internal(format!("clipboard unavailable: {}", e)))?;
    clipboard
        .set_text(url.trim().to_string())
        .map_err(|e| TrellisError::Internal(format!("clipboard write failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_is_rejected_before_touching_clipboard() {
        assert!(matches!(copy_url("  "), Err(TrellisError::Validation(_))));
    }
}
