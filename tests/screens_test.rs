// 🔁 End-to-end flows across the screen controllers
// Client and flag store included; the backend is mocked

use rala_bank::biometric::unlock_on_mount;
use rala_bank::{
    AlertQueue, BankClient, BiometricCapability, ClientConfig, DashboardScreen, Field, FlagStore,
    GateOutcome, LoadState, ProfileScreen, RegisterOutcome, RegisterScreen, RegistrationError,
    Route, Session, SqliteFlagStore, ALLOW_FINGERPRINT,
};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> BankClient {
    let config = ClientConfig::default()
        .with_api_url(&mock_server.uri())
        .unwrap();
    BankClient::new(&config).unwrap()
}

fn fill_form(screen: &mut RegisterScreen, cpf_keystrokes: &str) {
    screen.input(Field::Name, "Ana");
    screen.focus_next();
    assert_eq!(screen.focus(), Field::TaxId);
    for c in cpf_keystrokes.chars() {
        screen.type_char(c);
    }
    screen.input(Field::Nickname, "ana");
    screen.input(Field::Password, "secret");
    screen.input(Field::Confirmation, "secret");
}

// ── Registration ────────────────────────────────────────────────────

#[tokio::test]
async fn registration_typed_digits_reach_backend_masked() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contas"))
        .and(body_json(serde_json::json!({
            "nome": "Ana",
            "cpf": "123.456.789-00",
            "apelido": "ana",
            "senha": "secret"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let mut screen = RegisterScreen::new();
    fill_form(&mut screen, "12345678900");
    assert_eq!(screen.form().tax_id, "123.456.789-00");

    let mut alerts = AlertQueue::new();
    let outcome = screen.submit(&client, &mut alerts).await;

    assert_eq!(
        outcome,
        RegisterOutcome::Created {
            nickname: "ana".into(),
            next: Route::Login
        }
    );
    let alert = alerts.current().unwrap();
    assert_eq!(alert.title, "Cadastro realizado");
    assert_eq!(alert.message, "Usuário ana cadastrado com sucesso!");
    assert!(screen.form().name.is_empty());
}

#[tokio::test]
async fn registration_incomplete_cpf_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let mut screen = RegisterScreen::new();
    fill_form(&mut screen, "1234567890");

    let mut alerts = AlertQueue::new();
    let outcome = screen.submit(&client, &mut alerts).await;

    assert_eq!(outcome, RegisterOutcome::Invalid(RegistrationError::InvalidTaxId));
    assert_eq!(alerts.current().unwrap().title, "Erro");
    assert_eq!(screen.form().tax_id, "123.456.789-0");
}

#[tokio::test]
async fn registration_backend_error_keeps_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contas"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "message": "Apelido em uso" })),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let mut screen = RegisterScreen::new();
    fill_form(&mut screen, "12345678900");

    let mut alerts = AlertQueue::new();
    let outcome = screen.submit(&client, &mut alerts).await;

    assert_eq!(outcome, RegisterOutcome::Failed("Apelido em uso".into()));
    assert_eq!(alerts.current().unwrap().message, "Apelido em uso");
    assert_eq!(screen.form().nickname, "ana");
    assert!(!screen.is_submitting());
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_loads_both_sections() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contas/saldo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "saldo": 50 })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transferencias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 7,
            "categoria": "PIX",
            "contraparte": { "apelido": "bia", "nome": "Beatriz" },
            "data": "2024-03-05",
            "descricao": "Presente",
            "tipo": "recebida",
            "valor": 50
        }])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let session = Session::new("tok", None);
    let mut screen = DashboardScreen::new();
    let mut alerts = AlertQueue::new();

    screen.load(&client, &session, &mut alerts).await;

    assert!(alerts.is_empty());
    assert_eq!(screen.balance(), &LoadState::Loaded(50.0));
    assert_eq!(screen.transactions().loaded().map(Vec::len), Some(1));
    assert_eq!(screen.selected_transaction().map(|t| t.id), Some(7));
}

#[tokio::test]
async fn dashboard_failures_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contas/saldo"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transferencias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let session = Session::new("tok", None);
    let mut screen = DashboardScreen::new();
    let mut alerts = AlertQueue::new();

    screen.refresh(&client, &session, &mut alerts).await;

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts.current().unwrap().message, "Não foi possível carregar seu saldo");
    assert_eq!(screen.balance(), &LoadState::Loaded(0.0));
    assert_eq!(screen.transactions(), &LoadState::Loaded(Vec::new()));
    assert!(!screen.is_refreshing());
}

#[tokio::test]
async fn dashboard_signed_out_does_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let mut screen = DashboardScreen::new();
    let mut alerts = AlertQueue::new();

    screen.load(&client, &Session::default(), &mut alerts).await;

    assert!(alerts.is_empty());
    assert!(screen.balance().is_loading());
}

#[tokio::test]
async fn dashboard_forgets_data_after_logout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contas/saldo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "saldo": 999.5 })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transferencias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let mut session = Session::new("tok", None);
    let mut screen = DashboardScreen::new();
    let mut profile = ProfileScreen::default();
    let mut alerts = AlertQueue::new();

    screen.load(&client, &session, &mut alerts).await;
    assert_eq!(screen.balance(), &LoadState::Loaded(999.5));

    assert_eq!(profile.logout(&mut session), Route::Login);
    screen.refresh(&client, &session, &mut alerts).await;

    assert!(alerts.is_empty());
    assert!(screen.balance().is_loading());
    assert!(screen.transactions().is_loading());
}

// ── Biometric preference ────────────────────────────────────────────

struct AlwaysPasses;

impl BiometricCapability for AlwaysPasses {
    async fn has_hardware(&self) -> bool {
        true
    }

    async fn is_enrolled(&self) -> bool {
        true
    }

    async fn authenticate(&self, _prompt: &str, _fallback_label: &str) -> bool {
        true
    }
}

#[tokio::test]
async fn biometric_choice_survives_restart() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("data").join("rala.db");
    let mut alerts = AlertQueue::new();

    {
        let mut store = SqliteFlagStore::open(&db_path).unwrap();
        let outcome = unlock_on_mount(&mut store, &AlwaysPasses, &mut alerts).await.unwrap();
        assert_eq!(outcome, GateOutcome::Enabled);
    }

    let mut store = SqliteFlagStore::open(&db_path).unwrap();
    assert_eq!(store.get(ALLOW_FINGERPRINT).unwrap(), Some(true));

    let outcome = unlock_on_mount(&mut store, &AlwaysPasses, &mut alerts).await.unwrap();
    assert_eq!(outcome, GateOutcome::AlreadyDecided(true));

    // Turning it off from the profile sticks as well
    let mut profile = ProfileScreen::mount(&store).unwrap();
    assert!(profile.biometrics());
    assert!(!profile.toggle_biometrics(&mut store).unwrap());
    drop(store);

    let store = SqliteFlagStore::open(&db_path).unwrap();
    assert_eq!(store.get(ALLOW_FINGERPRINT).unwrap(), Some(false));
    assert!(alerts.is_empty());
}
