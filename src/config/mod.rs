/// Admin configuration management
/// Handles loading and persisting the moderation allow-list

pub mod admins;

#[cfg(test)]
mod tests {
    use super::admins::*;

    // =========================================================================
    // Test Suite: Membership and Mutation
    // =========================================================================

    #[test]
    fn test_new_deduplicates_preserving_order() {
        let config = AdminConfig::new(vec![3, 1, 3, 2, 1]);
        assert_eq!(config.ids(), &[3, 1, 2]);
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_is_admin() {
        let config = AdminConfig::new(vec![184858845221224448]);
        assert!(config.is_admin(184858845221224448));
        assert!(!config.is_admin(1));
    }

    #[test]
    fn test_add_reports_duplicates() {
        let mut config = AdminConfig::new(vec![1]);
        assert!(config.add(2));
        assert!(!config.add(2));
        assert_eq!(config.ids(), &[1, 2]);
    }

    #[test]
    fn test_remove_reports_missing() {
        let mut config = AdminConfig::new(vec![1, 2]);
        assert!(config.remove(1));
        assert!(!config.remove(1));
        assert_eq!(config.ids(), &[2]);
    }

    #[test]
    fn test_empty_config() {
        let config = AdminConfig::default();
        assert!(config.is_empty());
        assert!(!config.is_admin(1));
    }

    // =========================================================================
    // Test Suite: File Persistence
    // =========================================================================

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admins.json");

        let mut config = AdminConfig::new(vec![184858845221224448, 42]);
        config.add(7);
        config.save_to_file(&path).unwrap();

        let loaded = AdminConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_file_missing() {
        let result = AdminConfig::from_file("/nonexistent/admins.json");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to read file"));
    }

    #[test]
    fn test_from_file_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admins.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = AdminConfig::from_file(&path);
        assert!(result.unwrap_err().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_from_file_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admins.json");
        std::fs::write(&path, "[]").unwrap();

        let result = AdminConfig::from_file(&path);
        assert!(result.unwrap_err().contains("no IDs"));
    }

    #[test]
    fn test_load_from_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admins.json");
        std::fs::write(&path, "[11, 22]").unwrap();

        let loaded = AdminConfig::load_from(&path).unwrap();
        assert_eq!(loaded.ids(), &[11, 22]);
    }
}
