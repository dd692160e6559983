//! End-to-end store scenarios against the in-memory authority

use indexmap::IndexMap;
use jobforge_model::{Group, Project, RepoState, Task};
use jobforge_store::{
    AuthorityError, ConfigStore, EditMode, FetchStatus, JobUpdateResult, JobUpdateResults,
    StoreError, StoreEvent, StoreEventKind,
};
use jobforge_test_utils::{
    init_tracing, sample_build_task, sample_product, sample_project, InMemoryAuthority,
    RecordedRequest,
};
use jobforge_validate::{validate_task, ValidationContext, Verdict};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn empty_context_maps() -> (
    IndexMap<String, jobforge_model::Platform>,
    IndexMap<String, jobforge_model::Product>,
    IndexMap<String, jobforge_model::Task>,
    IndexMap<String, jobforge_model::TaskVariant>,
    IndexMap<String, jobforge_model::BuildProvider>,
) {
    (
        IndexMap::new(),
        IndexMap::new(),
        IndexMap::new(),
        IndexMap::new(),
        IndexMap::new(),
    )
}

#[tokio::test]
async fn create_task_end_to_end() {
    init_tracing();
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority.clone());

    let mut session = store.begin_create::<Task>();
    assert_eq!(session.mode(), EditMode::Create);

    // An empty draft is not submittable: id and script are both mandatory
    let (platforms, products, tasks, task_variants, build_providers) = empty_context_maps();
    let context =
        ValidationContext::new(&platforms, &products, &tasks, &task_variants, &build_providers);
    let result = validate_task(session.draft(), &context);
    assert_eq!(result.id, Verdict::Required);
    assert_eq!(result.script, Verdict::Required);
    assert!(!result.is_valid());

    session.set_id("t1").unwrap();
    session.draft_mut().script = "build.sh".to_string();
    assert!(validate_task(session.draft(), &context).is_valid());

    store.submit(&mut session).await.unwrap();

    // The stored copy is the authority's reply, the session now tracks it
    let stored = store.get::<Task>("t1").unwrap();
    assert_eq!(stored.script, "build.sh");
    assert_eq!(session.mode(), EditMode::Update);
    assert_eq!(session.draft(), stored);

    assert_eq!(
        authority.requests(),
        vec![RecordedRequest {
            method: "POST",
            group: Group::Tasks,
            id: None,
        }]
    );

    // A second submit takes the update path
    session.draft_mut().script = "build.sh --fast".to_string();
    store.submit(&mut session).await.unwrap();
    assert_eq!(
        store.get::<Task>("t1").unwrap().script,
        "build.sh --fast"
    );
    assert_eq!(authority.requests()[1].method, "PUT");
    assert_eq!(authority.requests()[1].id.as_deref(), Some("t1"));
}

#[tokio::test]
async fn create_reconciles_server_assigned_repo_state() {
    let authority = Arc::new(InMemoryAuthority::with_cloned_projects());
    let mut store = ConfigStore::new(authority);

    let draft = sample_project("mainline");
    assert_eq!(draft.repo_state, RepoState::NotCloned);

    let created = store.create(&draft).await.unwrap();

    // The authority's copy wins over the optimistic draft
    assert_eq!(created.repo_state, RepoState::Cloned);
    assert_eq!(
        store.get::<Project>("mainline").unwrap().repo_state,
        RepoState::Cloned
    );
}

#[tokio::test]
async fn delete_failure_leaves_collection_untouched() {
    let authority = Arc::new(InMemoryAuthority::new());
    authority.seed(
        Group::Tasks,
        vec![serde_json::to_value(sample_build_task("build")).unwrap()],
    );
    let mut store = ConfigStore::new(authority.clone());
    store.refresh::<Task>().await.unwrap();

    authority.fail_next(AuthorityError::Transport("connection reset".to_string()));
    let err = store.delete::<Task>("build").await.unwrap_err();
    assert_eq!(err, StoreError::Authority("connection reset".to_string()));

    // Nothing was removed and the failure is parked for the caller
    assert!(store.get::<Task>("build").is_some());
    assert_eq!(store.error(), Some("connection reset"));

    // A later successful delete needs no dismissal first
    store.delete::<Task>("build").await.unwrap();
    assert!(store.get::<Task>("build").is_none());
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn transport_failure_without_message_normalizes() {
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority.clone());

    authority.fail_next(AuthorityError::Transport(String::new()));
    let err = store.create(&sample_build_task("build")).await.unwrap_err();
    assert_eq!(err, StoreError::Authority("unknown error".to_string()));
    assert_eq!(store.error(), Some("unknown error"));
    assert!(store.get::<Task>("build").is_none());
}

#[tokio::test]
async fn rejected_create_surfaces_the_authority_message() {
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority.clone());

    authority.fail_next(AuthorityError::rejected("task id already in use"));
    let err = store.create(&sample_build_task("build")).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Authority("task id already in use".to_string())
    );

    // A successful retry supersedes the failure outcome
    store.create(&sample_build_task("build")).await.unwrap();
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn fetch_failure_marks_only_that_group() {
    let authority = Arc::new(InMemoryAuthority::new());
    authority.seed(
        Group::Products,
        vec![serde_json::to_value(sample_product()).unwrap()],
    );
    let mut store = ConfigStore::new(authority.clone());

    authority.fail_next(AuthorityError::Transport("down".to_string()));
    store.refresh::<Task>().await.unwrap_err();
    assert_eq!(
        store.fetch_status(Group::Tasks),
        FetchStatus::Failed("down".to_string())
    );
    assert_eq!(store.fetch_status(Group::Products), FetchStatus::NotLoaded);

    store.refresh::<jobforge_model::Product>().await.unwrap();
    assert_eq!(store.fetch_status(Group::Products), FetchStatus::Loaded);
    assert!(store.get::<jobforge_model::Product>("jdk17").is_some());
    assert_eq!(store.list::<jobforge_model::Product>().count(), 1);
}

#[tokio::test]
async fn refresh_all_continues_past_failed_groups() {
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority.clone());

    // Build providers are fetched first; fail exactly that call
    authority.fail_next(AuthorityError::Transport("down".to_string()));
    store.refresh_all().await;

    assert_eq!(
        store.fetch_status(Group::BuildProviders),
        FetchStatus::Failed("down".to_string())
    );
    for group in [
        Group::Platforms,
        Group::Products,
        Group::TaskVariants,
        Group::Tasks,
        Group::Projects,
    ] {
        assert_eq!(store.fetch_status(group), FetchStatus::Loaded);
    }
}

#[tokio::test]
async fn job_update_results_are_recorded_and_dismissed_independently() {
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority.clone());

    let results = JobUpdateResults {
        jobs_created: vec![JobUpdateResult {
            job_name: "build-jdk17-mainline-el8.x86_64.vagrant-release".to_string(),
            success: true,
            message: "created".to_string(),
        }],
        jobs_rewritten: vec![JobUpdateResult {
            job_name: "tck-jdk17-mainline".to_string(),
            success: false,
            message: "xml rejected".to_string(),
        }],
        ..JobUpdateResults::default()
    };
    authority.job_results_on_next_write(results.clone());

    store.create(&sample_project("mainline")).await.unwrap();
    assert_eq!(store.job_results(), Some(&results));
    assert_eq!(store.job_results().unwrap().failures().count(), 1);

    // The job report outlives later writes that carry none, until dismissed
    store.create(&sample_build_task("build")).await.unwrap();
    assert_eq!(store.job_results(), Some(&results));

    store.dismiss_job_results();
    assert_eq!(store.job_results(), None);
}

#[tokio::test]
async fn update_mode_rejects_a_changed_id() {
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority);

    let mut session = store.begin_create::<Task>();
    session.set_id("build").unwrap();
    session.draft_mut().script = "build.sh".to_string();
    store.submit(&mut session).await.unwrap();

    // The session now tracks the remote entity; renaming must not fork it
    let err = session.set_id("build-2").unwrap_err();
    assert!(matches!(err, StoreError::IdChanged { .. }));

    session.draft_mut().id = "build-2".to_string();
    let err = store.submit(&mut session).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::IdChanged {
            was: "build".to_string(),
            now: "build-2".to_string(),
        }
    );
    assert!(store.get::<Task>("build").is_some());
    assert!(store.get::<Task>("build-2").is_none());
}

#[tokio::test]
async fn begin_edit_clones_a_detached_draft() {
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority);
    store.create(&sample_build_task("build")).await.unwrap();

    let mut session = store.begin_edit::<Task>("build").unwrap();
    session.draft_mut().script = "changed.sh".to_string();

    // Edits stay detached until a successful submit reconciles them
    assert_eq!(store.get::<Task>("build").unwrap().script, "build.sh");

    store.submit(&mut session).await.unwrap();
    assert_eq!(store.get::<Task>("build").unwrap().script, "changed.sh");

    let err = store.begin_edit::<Task>("missing").unwrap_err();
    assert_eq!(
        err,
        StoreError::UnknownEntity {
            group: Group::Tasks,
            id: "missing".to_string(),
        }
    );
}

#[tokio::test]
async fn every_successful_write_notifies_subscribers() {
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority.clone());

    let seen: Arc<Mutex<Vec<StoreEventKind>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = store.subscribe(move |event| sink.lock().push(event.kind));

    store.create(&sample_build_task("build")).await.unwrap();
    store.create(&sample_build_task("build")).await.unwrap(); // same id, update-style replace
    store.delete::<Task>("build").await.unwrap();
    store.refresh::<Task>().await.unwrap();

    // A failed write emits nothing
    authority.fail_next(AuthorityError::rejected("no"));
    store.create(&sample_build_task("x")).await.unwrap_err();

    assert_eq!(
        *seen.lock(),
        vec![
            StoreEventKind::Created,
            StoreEventKind::Created,
            StoreEventKind::Deleted,
            StoreEventKind::Refreshed,
        ]
    );

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
}

#[tokio::test]
async fn events_carry_group_and_id() {
    let authority = Arc::new(InMemoryAuthority::new());
    let mut store = ConfigStore::new(authority);

    let seen: Arc<Mutex<Vec<StoreEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |event| sink.lock().push(event.clone()));

    store.create(&sample_build_task("build")).await.unwrap();

    let events = seen.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].group, Group::Tasks);
    assert_eq!(events[0].id.as_deref(), Some("build"));
}
