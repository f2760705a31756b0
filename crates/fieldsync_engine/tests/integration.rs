//! End-to-end sync scenarios over the full field-reporting schema.

use fieldsync_core::entities::{
    parameter_fields, photo_fields, progress_fields, report_fields, role_fields, user_fields,
    Report, Role, User,
};
use fieldsync_core::Repository;
use fieldsync_document::Document;
use fieldsync_engine::{
    standard_registry, LocalStores, MediaStore, MemoryRemoteStore, RemoteStore, SyncRequest,
    SyncService,
};
use std::sync::Arc;
use tempfile::TempDir;

const JPEG_PAYLOAD: &str = "/9j/4AAQSkZJRg==";

struct World {
    _dir: TempDir,
    stores: LocalStores,
    remote: Arc<MemoryRemoteStore>,
    service: SyncService,
}

fn world() -> World {
    let dir = TempDir::new().unwrap();
    let media = Arc::new(MediaStore::open(dir.path().join("images")).unwrap());
    let stores = LocalStores::in_memory();
    let registry = Arc::new(standard_registry(&stores, media));
    let remote = Arc::new(MemoryRemoteStore::new());
    let service = SyncService::new(registry, Arc::clone(&remote) as Arc<dyn RemoteStore>);
    World {
        _dir: dir,
        stores,
        remote,
        service,
    }
}

/// A remote snapshot of the whole schema lands locally in one pull run
/// when the types come in dependency order, photo sideload included.
#[test]
fn full_schema_pull_in_dependency_order() {
    let w = world();
    let role_id = w
        .remote
        .seed("roles", Document::new().with(role_fields::NAME, "agent"));
    let user_id = w.remote.seed(
        "users",
        Document::new()
            .with(user_fields::EMAIL, "agent@example.com")
            .with(user_fields::ROLE_ID, role_id),
    );
    let report_id = w.remote.seed(
        "reports",
        Document::new()
            .with(report_fields::SURFACE, 42.5)
            .with(report_fields::CREATOR_ID, user_id),
    );
    let photo_id = w.remote.seed(
        "report_photos",
        Document::new()
            .with(photo_fields::REPORT_ID, report_id)
            .with(photo_fields::PHOTO, JPEG_PAYLOAD),
    );

    let report = w.service.synchronize(&SyncRequest::pull([
        "roles",
        "users",
        "reports",
        "report_photos",
    ]));

    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(report.total_pulled(), 4);
    assert_eq!(report.total_failed(), 0);

    let user = w.stores.users.find_by_id(user_id).unwrap().unwrap();
    assert_eq!(user.role_id, Some(role_id));

    let photo = w.stores.photos.find_by_id(photo_id).unwrap().unwrap();
    let path = photo.photo_path.unwrap();
    assert!(
        path.ends_with(&format!("photo_{photo_id}_sig_{report_id}.jpg")),
        "got {path}"
    );
    assert!(std::path::Path::new(&path).exists());

    // Push-back stripped the payload and stabilized the remote copy.
    let remote_photo = w.remote.get_one("report_photos", photo_id).unwrap().unwrap();
    assert!(!remote_photo.contains(photo_fields::PHOTO));
    assert!(remote_photo.synchro());
}

/// Pulling a dependent type before its prerequisite fails record by
/// record with an error naming the dangling relation, and succeeds once
/// the prerequisite has been synchronized.
#[test]
fn dependency_order_violations_recover_on_retry() {
    let w = world();
    let role_id = w
        .remote
        .seed("roles", Document::new().with(role_fields::NAME, "agent"));
    w.remote.seed(
        "users",
        Document::new()
            .with(user_fields::EMAIL, "agent@example.com")
            .with(user_fields::ROLE_ID, role_id),
    );

    let premature = w.service.synchronize(&SyncRequest::pull(["users"]));
    assert!(!premature.success);
    assert_eq!(premature.results["users"].failed, 1);
    assert!(premature.errors[0].contains("role"));
    assert!(premature.errors[0].contains(&role_id.to_string()));
    assert!(w.stores.users.find_all().unwrap().is_empty());

    let ordered = w.service.synchronize(&SyncRequest::pull(["roles", "users"]));
    assert!(ordered.success, "errors: {:?}", ordered.errors);
    assert_eq!(w.stores.users.find_all().unwrap().len(), 1);
}

/// Locally created records push once, stay clean, and pushing again is a
/// no-op with identical remote content.
#[test]
fn push_is_idempotent() {
    let w = world();
    let role = w
        .stores
        .roles
        .save(Role {
            name: "agent".into(),
            synced: Some(false),
            ..Role::default()
        })
        .unwrap();
    let role_id = role.id.unwrap();
    w.stores
        .users
        .save(User {
            email: "agent@example.com".into(),
            role_id: Some(role_id),
            synced: Some(false),
            ..User::default()
        })
        .unwrap();

    let first = w.service.synchronize(&SyncRequest::push(["roles", "users"]));
    assert!(first.success);
    assert_eq!(first.total_pushed(), 2);
    let snapshot = w.remote.documents("roles");

    let second = w.service.synchronize(&SyncRequest::push(["roles", "users"]));
    assert_eq!(second.total_pushed(), 0);
    assert_eq!(w.remote.documents("roles"), snapshot, "remote unchanged");
}

/// A transport failure mid-run fails that type, keeps its records dirty,
/// and does not stop the remaining types.
#[test]
fn transport_failure_is_isolated_and_recoverable() {
    let w = world();
    w.stores
        .roles
        .save(Role {
            name: "agent".into(),
            synced: Some(false),
            ..Role::default()
        })
        .unwrap();
    w.remote.fail_pushes(true);

    let broken = w.service.synchronize(&SyncRequest::push(["roles"]));
    assert!(!broken.success);
    assert_eq!(broken.results["roles"].failed, 1);
    assert!(w.remote.documents("roles").is_empty());

    w.remote.fail_pushes(false);
    let recovered = w.service.synchronize(&SyncRequest::push(["roles"]));
    assert!(recovered.success);
    assert_eq!(recovered.results["roles"].pushed, 1);
}

/// One malformed record in a pulled collection does not poison its
/// neighbors, and relation failures leave no partial rows behind.
#[test]
fn pull_survives_partially_bad_collections() {
    let w = world();
    let role_id = w
        .remote
        .seed("roles", Document::new().with(role_fields::NAME, "agent"));
    w.service.synchronize(&SyncRequest::pull(["roles"]));

    let user_id = w.remote.seed(
        "users",
        Document::new()
            .with(user_fields::EMAIL, "ok@example.com")
            .with(user_fields::ROLE_ID, role_id),
    );
    w.remote.seed(
        "users",
        Document::new().with(user_fields::EMAIL, "no-role@example.com"),
    );
    w.remote.seed(
        "users",
        Document::new()
            .with(user_fields::EMAIL, "dangling@example.com")
            .with(user_fields::ROLE_ID, 999_999_i64),
    );

    let report = w.service.synchronize(&SyncRequest::pull(["users"]));
    assert!(!report.success);
    assert_eq!(report.results["users"].pulled, 1);
    assert_eq!(report.results["users"].failed, 2);

    let users = w.stores.users.find_all().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, Some(user_id));
}

/// A full bidirectional run over a mixed state converges: everything
/// dirty lands remotely, everything remote lands locally, and a second
/// run finds nothing left to do.
#[test]
fn bidirectional_run_converges() {
    let w = world();
    let role = w
        .stores
        .roles
        .save(Role {
            name: "local role".into(),
            synced: Some(false),
            ..Role::default()
        })
        .unwrap();
    w.remote
        .seed("roles", Document::new().with(role_fields::NAME, "remote role"));
    let remote_user_role = w
        .remote
        .seed("roles", Document::new().with(role_fields::NAME, "third role"));
    w.remote.seed(
        "users",
        Document::new()
            .with(user_fields::EMAIL, "remote@example.com")
            .with(user_fields::ROLE_ID, remote_user_role),
    );

    let first = w
        .service
        .synchronize(&SyncRequest::bidirectional(["roles", "users"]));
    assert!(first.success, "errors: {:?}", first.errors);
    assert_eq!(w.stores.roles.find_all().unwrap().len(), 3);
    assert_eq!(w.remote.documents("roles").len(), 3);
    assert!(w
        .remote
        .get_one("roles", role.id.unwrap())
        .unwrap()
        .is_some());

    // The pull leg always re-pushes what it applied, so convergence shows
    // on the push side: nothing is dirty anymore.
    let second = w.service.synchronize(&SyncRequest::push(["roles", "users"]));
    assert!(second.success);
    assert_eq!(second.total_pushed(), 0, "converged state pushes nothing");
}

/// Progress records enforce all three of their relations.
#[test]
fn progress_requires_user_status_and_report() {
    let w = world();
    let role_id = w.remote.seed("roles", Document::new());
    let user_id = w.remote.seed(
        "users",
        Document::new().with(user_fields::ROLE_ID, role_id),
    );
    let status_id = w.remote.seed("progress_statuses", Document::new());
    let report_id = w.remote.seed(
        "reports",
        Document::new().with(report_fields::CREATOR_ID, user_id),
    );
    w.remote.seed(
        "report_progress",
        Document::new()
            .with(progress_fields::USER_ID, user_id)
            .with(progress_fields::STATUS_ID, status_id)
            .with(progress_fields::REPORT_ID, report_id),
    );
    w.remote.seed(
        "report_progress",
        Document::new()
            .with(progress_fields::USER_ID, user_id)
            .with(progress_fields::REPORT_ID, report_id),
    );

    let report = w.service.synchronize(&SyncRequest::pull([
        "roles",
        "users",
        "progress_statuses",
        "reports",
        "report_progress",
    ]));

    assert!(!report.success);
    assert_eq!(report.results["report_progress"].pulled, 1);
    assert_eq!(report.results["report_progress"].failed, 1);
    assert!(report.errors[0].contains("status"));
    assert_eq!(w.stores.progress.find_all().unwrap().len(), 1);
}

/// Application parameters synchronize like any other relation-free type.
#[test]
fn parameters_pull_and_stabilize() {
    let w = world();
    let id = w.remote.seed(
        "parameters",
        Document::new()
            .with(parameter_fields::MAX_LOGIN_ATTEMPTS, 5_i64)
            .with(parameter_fields::SESSION_DURATION, 30_i64),
    );

    let report = w.service.synchronize(&SyncRequest::pull(["parameters"]));
    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(report.results["parameters"].pulled, 1);

    let parameter = w.stores.parameters.find_by_id(id).unwrap().unwrap();
    assert_eq!(parameter.max_login_attempts, Some(5));
    assert_eq!(parameter.session_duration, Some(30));
    assert_eq!(parameter.synced, Some(true));
    assert!(w.remote.get_one("parameters", id).unwrap().unwrap().synchro());
}

/// Geo locations cross the wire as native points and come back as WKT.
#[test]
fn report_location_round_trips_through_the_remote() {
    let w = world();
    let role = w
        .stores
        .roles
        .save(Role {
            id: Some(1),
            synced: Some(true),
            ..Role::default()
        })
        .unwrap();
    let user = w
        .stores
        .users
        .save(User {
            id: Some(2),
            role_id: role.id,
            synced: Some(true),
            ..User::default()
        })
        .unwrap();
    w.stores
        .reports
        .save(Report {
            id: Some(3),
            location: Some("POINT(18.92 47.52)".into()),
            creator_id: user.id,
            synced: Some(false),
            ..Report::default()
        })
        .unwrap();

    let pushed = w.service.synchronize(&SyncRequest::push(["reports"]));
    assert!(pushed.success);
    let remote_doc = w.remote.get_one("reports", 3).unwrap().unwrap();
    let point = remote_doc.get_geo_point(report_fields::LOCATION).unwrap();
    assert_eq!(point.longitude, 18.92);
    assert_eq!(point.latitude, 47.52);

    let pulled = w.service.synchronize(&SyncRequest::pull(["reports"]));
    assert!(pulled.success, "errors: {:?}", pulled.errors);
    let local = w.stores.reports.find_by_id(3).unwrap().unwrap();
    assert_eq!(local.location.as_deref(), Some("POINT(18.92 47.52)"));
}
