// 🏠 Dashboard - Balance card + transaction list
// Both fetches run together and fail independently

use crate::alert::Notifier;
use crate::client::BankClient;
use crate::models::{Session, Transaction};
use tracing::warn;

const BALANCE_FAILED: &str = "Não foi possível carregar seu saldo";
const TRANSACTIONS_FAILED: &str = "Não foi possível carregar suas transações";

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            LoadState::Loading => None,
        }
    }
}

#[derive(Debug)]
pub struct DashboardScreen {
    balance: LoadState<f64>,
    transactions: LoadState<Vec<Transaction>>,
    refreshing: bool,
    selected: Option<usize>,
    // Last good values, kept when a reload fails
    last_balance: f64,
    last_transactions: Vec<Transaction>,
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardScreen {
    pub fn new() -> Self {
        DashboardScreen {
            balance: LoadState::Loading,
            transactions: LoadState::Loading,
            refreshing: false,
            selected: None,
            last_balance: 0.0,
            last_transactions: Vec::new(),
        }
    }

    pub fn balance(&self) -> &LoadState<f64> {
        &self.balance
    }

    pub fn transactions(&self) -> &LoadState<Vec<Transaction>> {
        &self.transactions
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Fetch balance and transactions concurrently.
    ///
    /// While signed out nothing is fetched and any previous user's data is
    /// dropped. Each failure raises its own alert and leaves the previous
    /// value on screen; the other fetch still applies.
    pub async fn load<N: Notifier>(
        &mut self,
        client: &BankClient,
        session: &Session,
        notifier: &mut N,
    ) {
        if !session.is_authenticated() {
            self.reset();
            return;
        }

        self.balance = LoadState::Loading;
        self.transactions = LoadState::Loading;

        let (balance, transactions) = tokio::join!(
            client.fetch_balance(&session.token),
            client.fetch_transactions(&session.token),
        );

        match balance {
            Ok(value) => self.last_balance = value,
            Err(err) => {
                warn!(error = %err, "balance fetch failed");
                notifier.alert("Erro", BALANCE_FAILED);
            }
        }
        self.balance = LoadState::Loaded(self.last_balance);

        match transactions {
            Ok(list) => self.last_transactions = list,
            Err(err) => {
                warn!(error = %err, "transaction fetch failed");
                notifier.alert("Erro", TRANSACTIONS_FAILED);
            }
        }
        self.transactions = LoadState::Loaded(self.last_transactions.clone());
        self.reset_selection();
    }

    /// Back to the freshly mounted state, forgetting all fetched data
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Pull-to-refresh
    pub async fn refresh<N: Notifier>(
        &mut self,
        client: &BankClient,
        session: &Session,
        notifier: &mut N,
    ) {
        self.refreshing = true;
        self.load(client, session, notifier).await;
        self.refreshing = false;
    }

    /// "Good Morning!" greeting line
    pub fn greeting(&self, session: &Session) -> (String, String) {
        ("Good Morning!".to_string(), session.display_name().to_string())
    }

    // ========================================================================
    // LIST NAVIGATION
    // ========================================================================

    fn list(&self) -> &[Transaction] {
        self.transactions.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    fn reset_selection(&mut self) {
        self.selected = if self.list().is_empty() { None } else { Some(0) };
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.selected.and_then(|i| self.list().get(i))
    }

    pub fn next(&mut self) {
        let len = self.list().len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
    }

    pub fn previous(&mut self) {
        let len = self.list().len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    pub fn page_down(&mut self) {
        let len = self.list().len();
        if len == 0 {
            return;
        }
        let i = self.selected.map_or(0, |i| (i + PAGE_SIZE).min(len - 1));
        self.selected = Some(i);
    }

    pub fn page_up(&mut self) {
        if self.list().is_empty() {
            return;
        }
        let i = self.selected.map_or(0, |i| i.saturating_sub(PAGE_SIZE));
        self.selected = Some(i);
    }

    pub fn first(&mut self) {
        self.reset_selection();
    }

    pub fn last(&mut self) {
        let len = self.list().len();
        if len > 0 {
            self.selected = Some(len - 1);
        }
    }

    /// Raise the details alert for the selected transaction
    pub fn show_selected<N: Notifier>(&self, notifier: &mut N) -> bool {
        match self.selected_transaction() {
            Some(tx) => {
                notifier.alert("Detalhes", &tx.detail_text());
                true
            }
            None => false,
        }
    }
}
