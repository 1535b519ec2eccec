//! User-facing report of a fetch run.

use rustore_fetch::package::format_summary;
use rustore_fetch::{FetchOutcome, FetchReport};

/// Lines printed to stdout for `outcome`.
pub fn report_lines(outcome: &FetchOutcome) -> Vec<String> {
    match outcome {
        FetchOutcome::NotFound { .. } => vec!["Приложение не найдено".to_string()],
        FetchOutcome::LinkUnavailable { .. } => vec!["Ошибка получения ссылки".to_string()],
        FetchOutcome::Saved(report) => saved_lines(report),
    }
}

fn saved_lines(report: &FetchReport) -> Vec<String> {
    let mut lines = Vec::new();

    if report.container.is_extracted() {
        lines.push("APK извлечен из архива".to_string());
    }

    for warning in &report.warnings {
        lines.push(format!("Предупреждение: {}", warning));
    }

    if let Some(metadata) = report.metadata.metadata() {
        lines.push(format_summary(metadata));
    }

    lines.push(format!("SHA-256: {}", report.sha256));

    lines.push(format!("Сохранено: {}", report.output_path.display()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use rustore_fetch::package::{AppMetadata, ContainerKind, MetadataOutcome, PackageId};

    fn report(container: ContainerKind, metadata: MetadataOutcome) -> FetchReport {
        FetchReport {
            package: PackageId::parse("ru.oneme.app").unwrap(),
            app_name: Some("MAX".to_string()),
            output_path: PathBuf::from("ru.oneme.app.apk"),
            container,
            bytes_written: 3,
            sha256: "0".repeat(64),
            metadata,
            metadata_path: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_not_found() {
        let outcome = FetchOutcome::NotFound {
            reason: "missing".to_string(),
        };
        assert_eq!(report_lines(&outcome), vec!["Приложение не найдено"]);
    }

    #[test]
    fn test_link_unavailable() {
        let outcome = FetchOutcome::LinkUnavailable {
            reason: "denied".to_string(),
        };
        assert_eq!(report_lines(&outcome), vec!["Ошибка получения ссылки"]);
    }

    #[test]
    fn test_saved_with_metadata() {
        let metadata = AppMetadata {
            package: "ru.oneme.app".to_string(),
            version_name: Some("25.1.0".to_string()),
            version_code: Some(6512),
            min_sdk_version: Some(24),
            target_sdk_version: Some(34),
            whats_new: None,
        };
        let outcome = FetchOutcome::Saved(report(
            ContainerKind::Zip {
                entry: "app.apk".to_string(),
            },
            MetadataOutcome::Ok(metadata),
        ));

        let lines = report_lines(&outcome);

        assert_eq!(lines.first().unwrap(), "APK извлечен из архива");
        assert!(lines[1].contains("Version: 25.1.0 (6512)"));
        assert_eq!(lines.last().unwrap(), "Сохранено: ru.oneme.app.apk");
    }

    #[test]
    fn test_saved_without_metadata_warns() {
        let mut saved = report(
            ContainerKind::Raw,
            MetadataOutcome::Unavailable {
                reason: "package has no AndroidManifest.xml".to_string(),
            },
        );
        saved.warnings.push("package has no AndroidManifest.xml".to_string());
        saved.sha256 = "ab".repeat(32);

        let lines = report_lines(&FetchOutcome::Saved(saved));

        assert_eq!(
            lines,
            vec![
                "Предупреждение: package has no AndroidManifest.xml".to_string(),
                format!("SHA-256: {}", "ab".repeat(32)),
                "Сохранено: ru.oneme.app.apk".to_string(),
            ]
        );
    }
}
