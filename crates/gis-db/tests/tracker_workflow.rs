//! End-to-end tracker workflow against a file-backed database.
//!
//! Seeds reference data, records a project, analyzes it, approves a budget
//! increase, then reopens the database to check everything was persisted.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use gis_core::enums::{AuditAction, BudgetRequestStatus, EntityType};
use gis_db::repos::audit::AuditFilter;
use gis_db::repos::project::NewProject;
use gis_db::repos::suitability::{AnalysisOptions, AnalysisScope};
use gis_db::service::GisService;

const CITY_CENTER: (f64, f64) = (7.4478, 125.8078);

async fn open(dir: &TempDir) -> GisService {
    let path = dir.path().join("gis.db");
    GisService::open_local(&path.to_string_lossy()).await.unwrap()
}

#[tokio::test]
async fn workflow_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let (project_id, request_id) = {
        let svc = open(&dir).await;
        svc.seed_reference_data().await.unwrap();

        let project = svc
            .create_project(
                "planner",
                NewProject {
                    prn: Some("PRN-2025-001".into()),
                    name: "Public Market Expansion".into(),
                    barangay: Some("Magugpo Poblacion".into()),
                    latitude: Some(7.448),
                    longitude: Some(125.803),
                    project_cost: Some(1_000_000.0),
                    project_type: Some("market".into()),
                    ..NewProject::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(project.zone_type.as_deref(), Some("C-1"));
        assert!(!project.zone_validated);

        let run = svc
            .analyze_projects(
                "planner",
                &AnalysisOptions {
                    scope: AnalysisScope::Project(project.id.clone()),
                    save: true,
                    skip_existing: false,
                    city_center: CITY_CENTER,
                },
            )
            .await
            .unwrap();
        assert_eq!(run.summary.analyzed, 1);
        assert_eq!(run.summary.saved, 1);

        let request = svc
            .create_budget_request(&project.id, "engineer", 250_000.0, "Additional stalls")
            .await
            .unwrap();
        let decision = svc
            .approve_budget_request(&request.id, "finance", None, Some("Within ceiling"))
            .await
            .unwrap();
        assert_eq!(decision.project_cost, Some(1_250_000.0));

        (project.id, request.id)
    };

    let svc = open(&dir).await;

    let project = svc.get_project(&project_id).await.unwrap();
    assert_eq!(project.project_cost, Some(1_250_000.0));
    assert_eq!(
        svc.get_project_by_prn("PRN-2025-001").await.unwrap().map(|p| p.id),
        Some(project_id.clone())
    );

    let analysis = svc.get_analysis(&project_id).await.unwrap().unwrap();
    assert!((0.0..=100.0).contains(&analysis.overall_score));
    assert!(!analysis.risks.has_zoning_conflict);

    let request = svc.get_budget_request(&request_id).await.unwrap();
    assert_eq!(request.status, BudgetRequestStatus::Approved);
    assert_eq!(request.reviewed_by.as_deref(), Some("finance"));
    assert_eq!(svc.budget_request_history(&request_id).await.unwrap().len(), 1);

    let decided = svc
        .query_audit(&AuditFilter {
            entity_type: Some(EntityType::BudgetRequest),
            action: Some(AuditAction::Decided),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(decided.len(), 1);

    // Reseeding an existing tracker leaves the registry alone.
    let summary = svc.seed_reference_data().await.unwrap();
    assert!(summary.zones_skipped);
}

#[tokio::test]
async fn batch_runs_count_projects_without_coordinates() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir).await;
    svc.seed_reference_data().await.unwrap();

    for (name, barangay, location) in [
        ("Apokon Health Center", "Apokon", Some((7.43, 125.82))),
        ("Rice Mill Access Road", "Cuambogan", Some((7.47, 125.76))),
        ("Purok 3 Drainage", "Madaum", None),
    ] {
        svc.create_project(
            "planner",
            NewProject {
                name: name.into(),
                barangay: Some(barangay.into()),
                latitude: location.map(|(lat, _)| lat),
                longitude: location.map(|(_, lng)| lng),
                ..NewProject::default()
            },
        )
        .await
        .unwrap();
    }

    let options = AnalysisOptions {
        scope: AnalysisScope::All,
        save: true,
        skip_existing: true,
        city_center: CITY_CENTER,
    };
    let first = svc.analyze_projects("planner", &options).await.unwrap();
    assert_eq!(first.summary.analyzed, 2);
    assert_eq!(first.summary.no_coordinates, 1);
    assert_eq!(first.summary.errors, 0);

    let second = svc.analyze_projects("planner", &options).await.unwrap();
    assert_eq!(second.summary.skipped, 2);
    assert_eq!(second.summary.analyzed, 0);
    assert_eq!(svc.list_analyses(None).await.unwrap().len(), 2);
}
