use chrono::{Duration, Local, Utc};
use zapnutre_client::auth::{Role, Session, User};
use zapnutre_client::client::ZapNutreClient;
use zapnutre_client::config::{ClientConfig, DEFAULT_API_URL};
use zapnutre_client::models::NewCheckIn;
use zapnutre_client::{IntakeForm, Query, SubmissionCoordinator, SubmitError};

fn get_credentials() -> Option<(String, String)> {
    dotenvy::dotenv().ok();
    let email = std::env::var("ZAPNUTRE_EMAIL").ok()?;
    let password = std::env::var("ZAPNUTRE_PASSWORD").ok()?;
    Some((email, password))
}

async fn authenticated_client() -> Option<ZapNutreClient> {
    let (email, password) = get_credentials()?;
    let config = ClientConfig::from_env().ok()?;
    ZapNutreClient::login(config, &email, &password).await.ok()
}

fn patient(expires_in: Duration) -> Session {
    Session::new(
        User {
            id: "p-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: Role::Patient,
        },
        "token".to_string(),
        Utc::now() + expires_in,
    )
}

#[test]
fn config_joins_paths() {
    let config = ClientConfig::new("https://api.zapnutre.test/api/");
    assert_eq!(config.base_url, "https://api.zapnutre.test/api");
    assert_eq!(
        config.url("/patients/1/meals"),
        "https://api.zapnutre.test/api/patients/1/meals"
    );
    assert_eq!(ClientConfig::default().base_url, DEFAULT_API_URL);
}

#[test]
fn session_role_gate() {
    let session = patient(Duration::hours(1));
    assert!(session.require_role(Role::Patient).is_ok());
    assert!(session.require_role(Role::Nutritionist).is_err());
    assert!(!session.is_expired());
    assert!(patient(Duration::seconds(30)).is_expired());
}

#[test]
fn role_accepts_portuguese_names() {
    let role: Role = serde_json::from_str(r#""nutricionista""#).unwrap();
    assert_eq!(role, Role::Nutritionist);
    assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), r#""patient""#);
}

#[tokio::test]
async fn expired_session_is_not_authenticated() {
    let client =
        ZapNutreClient::with_session(ClientConfig::default(), patient(Duration::seconds(10)))
            .unwrap();
    assert!(!client.auth.is_authenticated().await);
    assert!(client.list_patients().await.is_err());

    let client =
        ZapNutreClient::with_session(ClientConfig::default(), patient(Duration::hours(1))).unwrap();
    assert!(client.auth.is_authenticated().await);
    assert_eq!(client.auth.current_role().await, Some(Role::Patient));
}

#[tokio::test]
async fn unauthenticated_submission_is_rejected() {
    let client = ZapNutreClient::new(ClientConfig::default()).unwrap();
    let coordinator = SubmissionCoordinator::new(client);

    let record = IntakeForm::new().record().clone();

    // No session, so the client fails before touching the network.
    match coordinator.submit(record).await {
        Err(SubmitError::Rejected(e)) => assert!(e.to_string().contains("Not signed in")),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(!coordinator.is_submitting());
}

#[tokio::test]
async fn dashboard_loads_through_query() {
    let Some(client) = authenticated_client().await else {
        eprintln!("skipping dashboard_loads_through_query: no credentials");
        return;
    };

    let client = &client;
    let query = Query::new(move || client.get_dashboard());
    query.refetch().await;

    let state = query.snapshot().await;
    assert!(state.error.is_none(), "dashboard failed: {:?}", state.error);
    assert!(state.data.is_some());
}

#[tokio::test]
async fn nutritionist_lists_patients() {
    let Some(client) = authenticated_client().await else {
        eprintln!("skipping nutritionist_lists_patients: no credentials");
        return;
    };
    let session = client.session().await.unwrap();
    if session.require_role(Role::Nutritionist).is_err() {
        eprintln!("skipping nutritionist_lists_patients: not a nutritionist account");
        return;
    }

    let patients = client.list_patients().await.unwrap();
    for p in &patients.data {
        assert!(!p.id.is_empty());
        assert!(!p.name.is_empty());
    }
}

#[tokio::test]
async fn patient_creates_checkin() {
    let Some(client) = authenticated_client().await else {
        eprintln!("skipping patient_creates_checkin: no credentials");
        return;
    };
    let session = client.session().await.unwrap();
    if session.require_role(Role::Patient).is_err() {
        eprintln!("skipping patient_creates_checkin: not a patient account");
        return;
    }

    let today = Local::now().date_naive();
    let created = client
        .create_checkin(
            &session.user.id,
            &NewCheckIn {
                date: today,
                weight: Some(70.0),
                adherence: Some(4),
                notes: Some("integration test".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.data.date, today);

    let checkins = client.list_checkins(&session.user.id).await.unwrap();
    assert!(checkins.data.iter().any(|c| c.id == created.data.id));
}
