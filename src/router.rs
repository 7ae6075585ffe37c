use std::sync::Arc;

use tracing::{debug, error, info};

use crate::bills::ReportListPipeline;
use crate::error::{BilledError, Result};
use crate::models::{DisplayReport, Role, SelectedFile, Session};
use crate::new_bill::{NewBillState, NewReportPipeline};
use crate::proof::proof_panel;
use crate::review::{Disclosure, Exclusion, ReviewPipeline};
use crate::routes::{Location, Outcome, Route};
use crate::session;
use crate::settings::Settings;
use crate::storage::Storage;
use crate::store::{Credentials, ReportStore, UserStore};
use crate::ui::{hooks, Ui};
use crate::views::{Renderer, Screen};

pub const LOGIN_BACKGROUND: &str = "#0E5AE5";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub path: Route,
    pub role: Role,
    pub last_error: Option<String>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            path: Route::Login,
            role: Role::Anonymous,
            last_error: None,
        }
    }
}

/// The screen currently under the root, with whatever state it owns.
enum Mounted {
    Login,
    Bills(Vec<DisplayReport>),
    NewBill(NewReportPipeline),
    Dashboard(ReviewPipeline),
    Failed(Route),
}

impl Mounted {
    fn route(&self) -> Route {
        match self {
            Mounted::Login => Route::Login,
            Mounted::Bills(_) => Route::Bills,
            Mounted::NewBill(_) => Route::NewBill,
            Mounted::Dashboard(_) => Route::Dashboard,
            Mounted::Failed(route) => *route,
        }
    }
}

/// Where a signed-in role lands.
pub fn home(role: Role) -> Route {
    match role {
        Role::Admin => Route::Dashboard,
        Role::Employee => Route::Bills,
        Role::Anonymous => Route::Login,
    }
}

fn owns(role: Role, route: Route) -> bool {
    match route {
        Route::Login => true,
        Route::Bills | Route::NewBill => role == Role::Employee,
        Route::Dashboard => role == Role::Admin,
    }
}

/// Owns the session gate, the mounted screen and the history.
///
/// Every entry point takes `&mut self`, so a pipeline settling always lands on
/// the screen that started it; actions aimed at a screen that is no longer
/// mounted are dropped.
pub struct Router<U: Ui> {
    ui: U,
    storage: Box<dyn Storage>,
    store: Option<Arc<dyn ReportStore>>,
    users: Option<Arc<dyn UserStore>>,
    renderer: Box<dyn Renderer>,
    test_accounts: Vec<String>,
    inspection_mode: bool,
    session: Session,
    state: NavigationState,
    history: Vec<Route>,
    previous_location: Option<Route>,
    mounted: Option<Mounted>,
}

impl<U: Ui> Router<U> {
    pub fn new(ui: U, storage: Box<dyn Storage>, renderer: Box<dyn Renderer>) -> Self {
        let settings = Settings::default();
        Self {
            ui,
            storage,
            store: None,
            users: None,
            renderer,
            test_accounts: settings.test_accounts,
            inspection_mode: settings.inspection_mode,
            session: Session::anonymous(),
            state: NavigationState::default(),
            history: Vec::new(),
            previous_location: None,
            mounted: None,
        }
    }

    pub fn with_store(mut self, store: Option<Arc<dyn ReportStore>>) -> Self {
        self.store = store;
        self
    }

    pub fn with_users(mut self, users: Option<Arc<dyn UserStore>>) -> Self {
        self.users = users;
        self
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.test_accounts = settings.test_accounts.clone();
        self.inspection_mode = settings.inspection_mode;
        self
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn mounted_route(&self) -> Option<Route> {
        self.mounted.as_ref().map(Mounted::route)
    }

    pub fn bills(&self) -> Option<&[DisplayReport]> {
        match &self.mounted {
            Some(Mounted::Bills(reports)) => Some(reports),
            _ => None,
        }
    }

    pub fn new_bill_state(&self) -> Option<NewBillState> {
        match &self.mounted {
            Some(Mounted::NewBill(pipeline)) => Some(pipeline.state()),
            _ => None,
        }
    }

    pub fn review(&self) -> Option<&ReviewPipeline> {
        match &self.mounted {
            Some(Mounted::Dashboard(pipeline)) => Some(pipeline),
            _ => None,
        }
    }

    fn resolve_session(&mut self) -> &Session {
        self.session = session::resolve(self.storage.as_ref());
        self.state.role = self.session.role;
        &self.session
    }

    /// Boot on the address the app was opened at.
    pub async fn start(&mut self, location: Location) {
        let authenticated = self.resolve_session().is_authenticated();
        if location.is_root() {
            if authenticated {
                let target = home(self.session.role);
                debug!(%target, "session found at root, skipping login");
                self.navigate(target.path()).await;
            } else {
                self.history.push(Route::Login);
                self.state.path = Route::Login;
                self.enter(Route::Login).await;
            }
            return;
        }
        self.navigate(location.target()).await;
    }

    /// Gate the requested path against the session, then mount its screen.
    pub async fn navigate(&mut self, path: &str) {
        let requested = Route::parse(path).unwrap_or_else(|| {
            debug!(path, "unknown route, falling back to login");
            Route::Login
        });
        let session = self.resolve_session().clone();

        let route = if !session.is_authenticated() {
            if requested.is_protected() {
                debug!(%requested, "no session, redirecting to login");
            }
            Route::Login
        } else if requested == Route::Login || !owns(session.role, requested) {
            home(session.role)
        } else {
            requested
        };

        self.history.push(route);
        self.state.path = route;
        self.enter(route).await;
    }

    /// History back. An anonymous visitor at the root gets the login screen;
    /// a signed-in one returns to the single remembered location.
    pub async fn pop_state(&mut self, location: Location) {
        self.history.pop();
        let authenticated = self.resolve_session().is_authenticated();
        if authenticated {
            let target = self
                .previous_location
                .unwrap_or_else(|| home(self.session.role));
            self.navigate(target.path()).await;
        } else if location.is_root() {
            self.state.path = Route::Login;
            self.enter(Route::Login).await;
        } else {
            self.navigate(Route::Login.path()).await;
        }
    }

    /// Check credentials against the user store, registering the account on
    /// its first login, then persist the session and go home.
    pub async fn login(&mut self, role: Role, email: &str, password: &str) -> Result<()> {
        if role == Role::Anonymous {
            return Err(BilledError::Other("cannot sign in without a role".to_string()));
        }
        let Some(users) = self.users.clone() else {
            return Err(BilledError::MissingStore);
        };
        let credentials = Credentials {
            role,
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = match users.login(&credentials).await {
            Ok(token) => token,
            Err(BilledError::NotFound(_)) => {
                info!(email, role = role.as_user_type(), "first login, creating account");
                users.create_user(&credentials).await?;
                users.login(&credentials).await?
            }
            Err(e) => {
                error!(error = %e, email, "login refused");
                return Err(e);
            }
        };
        session::sign_in(self.storage.as_mut(), role, email, &token)?;
        info!(email, role = role.as_user_type(), "signed in");
        let target = home(role);
        self.previous_location = Some(target);
        self.navigate(target.path()).await;
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<()> {
        session::sign_out(self.storage.as_mut())?;
        info!("signed out");
        self.previous_location = None;
        self.navigate(Route::Login.path()).await;
        Ok(())
    }

    fn highlight(&mut self, icon: &str) {
        for hook in [hooks::ICON_WINDOW, hooks::ICON_MAIL] {
            self.ui.set_class(hook, hooks::ACTIVE_ICON, hook == icon);
        }
    }

    fn mount(&mut self, screen: &Screen) {
        let markup = self.renderer.render(screen);
        self.ui.set_content(hooks::ROOT, &markup);
    }

    fn fail(&mut self, route: Route, message: String) {
        self.mount(&Screen::Error {
            route,
            message: &message,
        });
        self.state.last_error = Some(message);
        self.mounted = Some(Mounted::Failed(route));
    }

    async fn enter(&mut self, route: Route) {
        self.state.last_error = None;
        match route {
            Route::Login => {
                self.mount(&Screen::Login);
                self.ui
                    .set_style(hooks::BODY, &[("background-color", LOGIN_BACKGROUND)]);
                self.mounted = Some(Mounted::Login);
            }
            Route::Bills => {
                self.mount(&Screen::Loading(route));
                self.mounted = None;
                let result = ReportListPipeline::new(self.store.clone()).list().await;
                match result {
                    Ok(Some(listing)) => {
                        self.mount(&Screen::Bills(&listing.reports));
                        self.mounted = Some(Mounted::Bills(listing.reports));
                    }
                    Ok(None) => self.fail(route, BilledError::MissingStore.to_string()),
                    Err(e) => {
                        error!(error = %e, "could not load reports");
                        self.fail(route, e.to_string());
                    }
                }
            }
            Route::NewBill => {
                self.mount(&Screen::NewBill);
                let pipeline = NewReportPipeline::new(self.store.clone(), &self.session.identity);
                self.mounted = Some(Mounted::NewBill(pipeline));
            }
            Route::Dashboard => {
                self.mount(&Screen::Loading(route));
                self.mounted = None;
                let exclusion = if self.inspection_mode {
                    Exclusion::None
                } else {
                    Exclusion::for_reviewer(&self.session.identity, &self.test_accounts)
                };
                let mut pipeline = ReviewPipeline::new(self.store.clone(), exclusion);
                let result = pipeline.get_all().await;
                match result {
                    Ok(Some(reports)) => {
                        pipeline.set_reports(reports);
                        self.mount(&Screen::Dashboard {
                            counts: pipeline.bucket_counts(),
                        });
                        self.mounted = Some(Mounted::Dashboard(pipeline));
                    }
                    Ok(None) => self.fail(route, BilledError::MissingStore.to_string()),
                    Err(e) => {
                        error!(error = %e, "could not load reports");
                        self.fail(route, e.to_string());
                    }
                }
            }
        }
        // The navbar icons live under the root, so they are set after the final mount.
        match route {
            Route::Login => {}
            Route::NewBill => self.highlight(hooks::ICON_MAIL),
            Route::Bills | Route::Dashboard => self.highlight(hooks::ICON_WINDOW),
        }
        debug!(%route, role = self.state.role.as_user_type(), "screen entered");
    }

    async fn apply(&mut self, outcome: Outcome) {
        if let Outcome::Navigate(route) = outcome {
            self.navigate(route.path()).await;
        }
    }

    fn stale(&self, action: &str) {
        debug!(action, mounted = ?self.mounted_route(), "action on unmounted screen ignored");
    }

    pub async fn click_new_bill(&mut self) {
        if matches!(self.mounted, Some(Mounted::Bills(_))) {
            self.navigate(Route::NewBill.path()).await;
        } else {
            self.stale("new-bill");
        }
    }

    /// Open a listed report's proof in the employee modal.
    pub fn view_proof(&mut self, id: &str) -> bool {
        let Some(Mounted::Bills(reports)) = &self.mounted else {
            self.stale("view-proof");
            return false;
        };
        let Some(row) = reports.iter().find(|r| r.report.id == id) else {
            debug!(id, "no such report on screen");
            return false;
        };
        let panel = proof_panel(
            row.report.proof_url.as_deref(),
            row.report.proof_file_name.as_deref(),
        );
        let markup = self.renderer.render(&Screen::Proof(&panel));
        self.ui.set_content(hooks::MODAL_EMPLOYEE, &markup);
        true
    }

    pub async fn select_file(&mut self, file: Option<SelectedFile>) {
        match &mut self.mounted {
            Some(Mounted::NewBill(pipeline)) => pipeline.select_file(&mut self.ui, file).await,
            _ => self.stale("select-file"),
        }
    }

    pub async fn submit_new_bill(&mut self) {
        let outcome = match &mut self.mounted {
            Some(Mounted::NewBill(pipeline)) => pipeline.submit(&self.ui).await,
            _ => {
                self.stale("submit");
                Outcome::Stay
            }
        };
        self.apply(outcome).await;
    }

    pub fn toggle_bucket(&mut self, bucket: usize) -> Option<Disclosure> {
        match &mut self.mounted {
            Some(Mounted::Dashboard(pipeline)) => {
                pipeline.toggle_bucket(&mut self.ui, self.renderer.as_ref(), bucket)
            }
            _ => {
                self.stale("toggle-bucket");
                None
            }
        }
    }

    pub fn select_report(&mut self, id: &str) -> Option<Disclosure> {
        match &mut self.mounted {
            Some(Mounted::Dashboard(pipeline)) => {
                pipeline.select_report(&mut self.ui, self.renderer.as_ref(), id)
            }
            _ => {
                self.stale("select-report");
                None
            }
        }
    }

    pub fn show_admin_proof(&mut self) -> bool {
        match &self.mounted {
            Some(Mounted::Dashboard(pipeline)) => {
                pipeline.show_proof(&mut self.ui, self.renderer.as_ref())
            }
            _ => {
                self.stale("show-proof");
                false
            }
        }
    }

    pub async fn accept(&mut self, id: &str) {
        let outcome = match &self.mounted {
            Some(Mounted::Dashboard(pipeline)) => pipeline.accept(&self.ui, id).await,
            _ => {
                self.stale("accept");
                Outcome::Stay
            }
        };
        self.apply(outcome).await;
    }

    pub async fn refuse(&mut self, id: &str) {
        let outcome = match &self.mounted {
            Some(Mounted::Dashboard(pipeline)) => pipeline.refuse(&self.ui, id).await,
            _ => {
                self.stale("refuse");
                Outcome::Stay
            }
        };
        self.apply(outcome).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Report, ReportStatus};
    use crate::storage::MemoryStorage;
    use crate::store::{MemoryStore, StoreCall};
    use crate::ui::Document;
    use crate::views::TextRenderer;

    fn report(id: &str, owner: &str, status: ReportStatus) -> Report {
        Report {
            id: id.to_string(),
            owner_identity: owner.to_string(),
            label: format!("label-{id}"),
            date: "2004-04-04".to_string(),
            proof_url: Some(format!("https://localhost:3456/images/{id}.jpg")),
            proof_file_name: Some(format!("{id}.jpg")),
            status,
            ..Report::default()
        }
    }

    fn signed_in(role: Role, email: &str) -> Box<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        session::sign_in(&mut storage, role, email, &session::issue_token(email)).unwrap();
        Box::new(storage)
    }

    fn router(storage: Box<MemoryStorage>, store: &Arc<MemoryStore>) -> Router<Document> {
        let reports: Arc<dyn ReportStore> = store.clone();
        let users: Arc<dyn UserStore> = store.clone();
        Router::new(Document::new(), storage, Box::new(TextRenderer))
            .with_store(Some(reports))
            .with_users(Some(users))
    }

    #[tokio::test]
    async fn test_root_with_employee_session_skips_login() {
        let store = Arc::new(MemoryStore::with_reports(vec![report(
            "r1",
            "a@a",
            ReportStatus::Pending,
        )]));
        let mut r = router(signed_in(Role::Employee, "a@a"), &store);
        r.start(Location::root()).await;

        assert_eq!(r.mounted_route(), Some(Route::Bills));
        assert_eq!(r.history(), &[Route::Bills]);
        assert!(!r.ui().content(hooks::ROOT).contains("[form-employee]"));
        assert!(r.ui().content(hooks::ROOT).contains("label-r1"));
        assert_eq!(r.ui().style(hooks::BODY, "background-color"), None);
        assert!(r.ui().has_class(hooks::ICON_WINDOW, hooks::ACTIVE_ICON));
    }

    #[tokio::test]
    async fn test_hash_route_without_token_redirects_to_login() {
        let store = Arc::new(MemoryStore::with_reports(vec![report(
            "r1",
            "a@a",
            ReportStatus::Pending,
        )]));
        let mut r = router(Box::new(MemoryStorage::new()), &store);
        r.start(Location::parse("#employee/bills")).await;

        assert_eq!(r.mounted_route(), Some(Route::Login));
        assert!(store.calls().is_empty());
        assert_eq!(
            r.ui().style(hooks::BODY, "background-color"),
            Some(LOGIN_BACKGROUND)
        );
    }

    #[tokio::test]
    async fn test_plain_path_is_guarded_too() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(Box::new(MemoryStorage::new()), &store);
        r.start(Location::parse("/admin/dashboard")).await;
        assert_eq!(r.mounted_route(), Some(Route::Login));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_user_without_token_is_anonymous() {
        let mut storage = MemoryStorage::new();
        storage
            .set(session::USER_KEY, r#"{"type":"Employee","email":"a@a"}"#)
            .unwrap();
        let store = Arc::new(MemoryStore::new());
        let mut r = router(Box::new(storage), &store);
        r.start(Location::root()).await;
        assert_eq!(r.mounted_route(), Some(Route::Login));
        assert_eq!(r.state().role, Role::Anonymous);
    }

    #[tokio::test]
    async fn test_list_failure_renders_error_panel() {
        let store = Arc::new(MemoryStore::new().failing_on(StoreCall::List));
        let mut r = router(signed_in(Role::Employee, "a@a"), &store);
        r.start(Location::root()).await;

        assert_eq!(r.mounted_route(), Some(Route::Bills));
        assert!(r.bills().is_none());
        assert!(r.ui().content(hooks::ROOT).contains("Erreur 404"));
        assert_eq!(r.state().last_error.as_deref(), Some("Store error: Erreur 404"));
    }

    #[tokio::test]
    async fn test_missing_store_renders_error_panel() {
        let mut r = Router::new(
            Document::new(),
            signed_in(Role::Admin, "boss@company.tld"),
            Box::new(TextRenderer),
        );
        r.start(Location::root()).await;
        assert_eq!(r.mounted_route(), Some(Route::Dashboard));
        assert!(r.review().is_none());
        assert!(r.ui().content(hooks::ROOT).contains("No data store configured"));
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(Box::new(MemoryStorage::new()), &store);
        r.start(Location::root()).await;
        assert_eq!(r.mounted_route(), Some(Route::Login));

        r.login(Role::Employee, "a@a", "pw").await.unwrap();
        assert_eq!(r.mounted_route(), Some(Route::Bills));
        assert_eq!(r.session().identity, "a@a");

        r.logout().await.unwrap();
        assert_eq!(r.mounted_route(), Some(Route::Login));
        assert!(!r.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_role_is_sent_home_from_foreign_route() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(signed_in(Role::Employee, "a@a"), &store);
        r.navigate("#admin/dashboard").await;
        assert_eq!(r.mounted_route(), Some(Route::Bills));
    }

    #[tokio::test]
    async fn test_new_bill_highlights_mail_icon() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(signed_in(Role::Employee, "a@a"), &store);
        r.start(Location::root()).await;
        r.click_new_bill().await;

        assert_eq!(r.mounted_route(), Some(Route::NewBill));
        assert_eq!(r.new_bill_state(), Some(NewBillState::Empty));
        assert!(r.ui().has_class(hooks::ICON_MAIL, hooks::ACTIVE_ICON));
        assert!(!r.ui().has_class(hooks::ICON_WINDOW, hooks::ACTIVE_ICON));
        // NewBill does not fetch
        assert_eq!(store.calls(), vec![StoreCall::List]);
    }

    #[tokio::test]
    async fn test_new_bill_submission_returns_to_bills() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(signed_in(Role::Employee, "a@a"), &store);
        r.navigate(Route::NewBill.path()).await;

        r.select_file(Some(SelectedFile {
            name: "C:\\fakepath\\ticket.png".to_string(),
            bytes: vec![137, 80, 78, 71],
        }))
        .await;
        assert_eq!(r.new_bill_state(), Some(NewBillState::FileAccepted));

        r.ui_mut().set_value(hooks::EXPENSE_NAME, "Taxi");
        r.ui_mut().set_value(hooks::DATE, "2004-04-04");
        r.ui_mut().set_value(hooks::AMOUNT, "42");
        r.submit_new_bill().await;

        assert_eq!(r.mounted_route(), Some(Route::Bills));
        assert_eq!(
            store.calls(),
            vec![StoreCall::Create, StoreCall::Update, StoreCall::List]
        );
        assert_eq!(r.bills().map(|b| b.len()), Some(1));
    }

    #[tokio::test]
    async fn test_view_proof_on_bills() {
        let store = Arc::new(MemoryStore::with_reports(vec![report(
            "r1",
            "a@a",
            ReportStatus::Pending,
        )]));
        let mut r = router(signed_in(Role::Employee, "a@a"), &store);
        r.start(Location::root()).await;

        assert!(r.view_proof("r1"));
        assert!(r
            .ui()
            .content(hooks::MODAL_EMPLOYEE)
            .contains("https://localhost:3456/images/r1.jpg"));
        assert!(!r.view_proof("nope"));
    }

    #[tokio::test]
    async fn test_stale_actions_are_ignored() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(Box::new(MemoryStorage::new()), &store);
        r.start(Location::root()).await;

        r.submit_new_bill().await;
        assert_eq!(r.toggle_bucket(1), None);
        r.accept("r1").await;
        assert_eq!(r.mounted_route(), Some(Route::Login));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_admin_review_flow_refetches_after_decision() {
        let store = Arc::new(MemoryStore::with_reports(vec![
            report("r1", "a@a", ReportStatus::Pending),
            report("r2", "boss@company.tld", ReportStatus::Pending),
        ]));
        let mut r = router(signed_in(Role::Admin, "boss@company.tld"), &store);
        r.start(Location::root()).await;
        assert_eq!(r.mounted_route(), Some(Route::Dashboard));

        assert_eq!(r.toggle_bucket(1), Some(Disclosure::Open));
        let bucket = r.ui().content("status-bills-container1").to_string();
        assert!(bucket.contains("[open-billr1]"));
        assert!(!bucket.contains("[open-billr2]"));

        assert_eq!(r.select_report("r1"), Some(Disclosure::Open));
        assert!(r.show_admin_proof());
        r.ui_mut().set_value(hooks::ADMIN_COMMENT, "vu");
        r.accept("r1").await;

        assert_eq!(r.mounted_route(), Some(Route::Dashboard));
        assert_eq!(
            store.calls(),
            vec![StoreCall::List, StoreCall::Update, StoreCall::List]
        );
        let refreshed = r.review().unwrap();
        assert_eq!(refreshed.reports()[0].status, ReportStatus::Accepted);
        // a fresh dashboard starts collapsed
        assert_eq!(refreshed.bucket_state(1), Disclosure::Collapsed);
    }

    #[tokio::test]
    async fn test_inspection_mode_shows_every_owner() {
        let store = Arc::new(MemoryStore::with_reports(vec![report(
            "r2",
            "boss@company.tld",
            ReportStatus::Pending,
        )]));
        let settings = Settings {
            inspection_mode: true,
            ..Settings::default()
        };
        let mut r = router(signed_in(Role::Admin, "boss@company.tld"), &store).with_settings(&settings);
        r.start(Location::root()).await;
        r.toggle_bucket(1);
        assert!(r.ui().content("status-bills-container1").contains("[open-billr2]"));
    }

    #[tokio::test]
    async fn test_pop_state() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(Box::new(MemoryStorage::new()), &store);
        r.pop_state(Location::root()).await;
        assert_eq!(r.mounted_route(), Some(Route::Login));
        assert_eq!(
            r.ui().style(hooks::BODY, "background-color"),
            Some(LOGIN_BACKGROUND)
        );

        r.login(Role::Employee, "a@a", "pw").await.unwrap();
        r.navigate(Route::NewBill.path()).await;
        // back always lands on the remembered location
        r.pop_state(Location::parse("#employee/bill/new")).await;
        assert_eq!(r.mounted_route(), Some(Route::Bills));
    }

    #[tokio::test]
    async fn test_pop_state_without_remembered_location_goes_home() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(signed_in(Role::Admin, "boss@company.tld"), &store);
        r.pop_state(Location::parse("#admin/dashboard")).await;
        assert_eq!(r.mounted_route(), Some(Route::Dashboard));
        assert!(r.ui().has_class(hooks::ICON_WINDOW, hooks::ACTIVE_ICON));
    }

    #[tokio::test]
    async fn test_admin_cannot_decide_hidden_reports() {
        let store = Arc::new(MemoryStore::with_reports(vec![
            report("mine", "boss@company.tld", ReportStatus::Pending),
            report("demo", "employee@test.tld", ReportStatus::Pending),
        ]));
        let mut r = router(signed_in(Role::Admin, "boss@company.tld"), &store);
        r.start(Location::root()).await;

        assert_eq!(r.select_report("mine"), None);
        r.accept("mine").await;
        r.refuse("demo").await;

        assert_eq!(store.calls(), vec![StoreCall::List]);
        assert!(store
            .reports()
            .iter()
            .all(|report| report.status == ReportStatus::Pending));
        assert!(r.ui().content(hooks::ROOT).contains("En attente (0)"));
    }

    #[tokio::test]
    async fn test_login_checks_password_and_keeps_it_out_of_storage() {
        let store = Arc::new(MemoryStore::new());
        let mut r = router(Box::new(MemoryStorage::new()), &store);
        r.login(Role::Employee, "a@a", "pw").await.unwrap();
        r.logout().await.unwrap();

        let refused = r.login(Role::Employee, "a@a", "wrong").await;
        assert!(matches!(refused, Err(BilledError::InvalidCredentials(_))));
        assert_eq!(r.mounted_route(), Some(Route::Login));
        assert!(!r.session().is_authenticated());

        r.login(Role::Employee, "a@a", "pw").await.unwrap();
        assert_eq!(r.mounted_route(), Some(Route::Bills));
        let user = r.storage.get(session::USER_KEY).unwrap();
        assert!(!user.contains("pw"));
    }

    #[tokio::test]
    async fn test_login_without_user_store_fails() {
        let mut r = Router::new(
            Document::new(),
            Box::new(MemoryStorage::new()),
            Box::new(TextRenderer),
        );
        assert!(matches!(
            r.login(Role::Admin, "boss@company.tld", "pw").await,
            Err(BilledError::MissingStore)
        ));
    }
}
