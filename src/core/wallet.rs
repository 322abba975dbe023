use log::{debug, info};

use crate::core::account::{Account, AccountId, Money};
use crate::core::error::{WalletError, WalletResult};
use crate::core::favorite::Favorite;
use crate::core::payment::{Payment, PaymentStatus};
use crate::core::registry::Registry;

/// In-memory ledger of accounts, payments and favorites.
///
/// Every operation validates before it mutates, so a failed call
/// leaves the wallet untouched.
#[derive(Default)]
pub struct Wallet {
    last_account_id: AccountId,
    accounts: Registry<Account>,
    payments: Registry<Payment>,
    favorites: Registry<Favorite>,
}

impl Wallet {
    pub fn new() -> Wallet {
        Wallet::default()
    }

    pub fn register_account(&mut self, phone: &str) -> WalletResult<&Account> {
        if self.accounts.iter().any(|account| account.phone == phone) {
            return Err(WalletError::PhoneAlreadyRegistered);
        }
        self.last_account_id += 1;
        info!("registered account #{} for {}", self.last_account_id, phone);
        Ok(&*self.accounts.insert(Account::new(self.last_account_id, phone)))
    }

    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> WalletResult<()> {
        if amount <= 0 {
            return Err(WalletError::AmountMustBePositive);
        }
        let account = self.find_account_by_id_mut(account_id)?;
        account.balance = account.balance.checked_add(amount)
            .ok_or(WalletError::BalanceOverflow)?;
        debug!("deposited {} to account #{}", amount, account_id);
        Ok(())
    }

    pub fn pay(&mut self, account_id: AccountId, amount: Money, category: &str) -> WalletResult<&Payment> {
        if amount <= 0 {
            return Err(WalletError::AmountMustBePositive);
        }
        let account = self.find_account_by_id_mut(account_id)?;
        if account.balance < amount {
            return Err(WalletError::InsufficientBalance);
        }
        account.balance -= amount;

        let payment = Payment::new(account_id, amount, category);
        debug!("account #{} paid {} for {} as {}", account_id, amount, category, payment.id);
        Ok(&*self.payments.insert(payment))
    }

    /// Fails an in-progress payment and credits its amount back.
    /// Only in-progress payments can be rejected: a second call returns
    /// `PaymentAlreadyFinalized` instead of crediting the account again.
    pub fn reject(&mut self, payment_id: &str) -> WalletResult<()> {
        let payment = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, status) = (payment.account_id, payment.amount, payment.status);
        let balance = self.find_account_by_id(account_id)?.balance;
        if status != PaymentStatus::InProgress {
            return Err(WalletError::PaymentAlreadyFinalized);
        }
        let credited = balance.checked_add(amount).ok_or(WalletError::BalanceOverflow)?;

        self.find_payment_by_id_mut(payment_id)?.status = PaymentStatus::Fail;
        self.find_account_by_id_mut(account_id)?.balance = credited;
        debug!("rejected payment {}, returned {} to account #{}", payment_id, amount, account_id);
        Ok(())
    }

    pub fn repeat(&mut self, payment_id: &str) -> WalletResult<&Payment> {
        let payment = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) = (payment.account_id, payment.amount, payment.category.clone());
        self.pay(account_id, amount, &category)
    }

    pub fn favorite_payment(&mut self, payment_id: &str, name: &str) -> WalletResult<&Favorite> {
        if self.favorites.iter().any(|favorite| favorite.name == name) {
            return Err(WalletError::FavoriteAlreadyRegistered);
        }
        let favorite = Favorite::from_payment(self.find_payment_by_id(payment_id)?, name);
        debug!("saved payment {} as favorite {:?}", payment_id, name);
        Ok(&*self.favorites.insert(favorite))
    }

    /// Pays the favorite's stored amount and category
    /// from its account as a new payment.
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> WalletResult<&Payment> {
        let favorite = self.find_favorite_by_id(favorite_id)?;
        let (account_id, amount, category) = (favorite.account_id, favorite.amount, favorite.category.clone());
        self.pay(account_id, amount, &category)
    }

    /// Copies of all payments made from the account, oldest first.
    pub fn export_account_history(&self, account_id: AccountId) -> WalletResult<Vec<Payment>> {
        let account = self.find_account_by_id(account_id)?;
        return Ok(self.payments.iter()
            .filter(|payment| payment.account_id == account.id)
            .cloned()
            .collect());
    }

    pub fn find_account_by_id(&self, account_id: AccountId) -> WalletResult<&Account> {
        self.accounts.get(&account_id).ok_or(WalletError::AccountNotFound)
    }

    pub fn find_account_by_id_mut(&mut self, account_id: AccountId) -> WalletResult<&mut Account> {
        self.accounts.get_mut(&account_id).ok_or(WalletError::AccountNotFound)
    }

    pub fn find_payment_by_id(&self, payment_id: &str) -> WalletResult<&Payment> {
        self.payments.get(payment_id).ok_or(WalletError::PaymentNotFound)
    }

    pub fn find_payment_by_id_mut(&mut self, payment_id: &str) -> WalletResult<&mut Payment> {
        self.payments.get_mut(payment_id).ok_or(WalletError::PaymentNotFound)
    }

    pub fn find_favorite_by_id(&self, favorite_id: &str) -> WalletResult<&Favorite> {
        self.favorites.get(favorite_id).ok_or(WalletError::FavoriteNotFound)
    }

    pub fn find_favorite_by_id_mut(&mut self, favorite_id: &str) -> WalletResult<&mut Favorite> {
        self.favorites.get_mut(favorite_id).ok_or(WalletError::FavoriteNotFound)
    }

    pub fn accounts(&self) -> impl ExactSizeIterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn payments(&self) -> impl ExactSizeIterator<Item = &Payment> {
        self.payments.iter()
    }

    pub fn favorites(&self) -> impl ExactSizeIterator<Item = &Favorite> {
        self.favorites.iter()
    }

    pub fn num_accounts(&self) -> usize {
        self.accounts.len()
    }

    pub fn num_payments(&self) -> usize {
        self.payments.len()
    }

    pub fn num_favorites(&self) -> usize {
        self.favorites.len()
    }

    /// Imports an account: an existing account with the same id takes
    /// the imported phone and balance, otherwise the account is added.
    /// The id counter only ever moves forward.
    pub(crate) fn merge_account(&mut self, imported: Account) {
        self.last_account_id = self.last_account_id.max(imported.id);
        match self.accounts.get_mut(&imported.id) {
            Some(account) => {
                account.phone = imported.phone;
                account.balance = imported.balance;
            },
            None => {
                self.accounts.insert(imported);
            }
        }
    }

    pub(crate) fn merge_payment(&mut self, imported: Payment) {
        match self.payments.get_mut(imported.id.as_str()) {
            Some(payment) => {
                payment.account_id = imported.account_id;
                payment.amount = imported.amount;
                payment.category = imported.category;
                payment.status = imported.status;
            },
            None => {
                self.payments.insert(imported);
            }
        }
    }

    pub(crate) fn merge_favorite(&mut self, imported: Favorite) {
        match self.favorites.get_mut(imported.id.as_str()) {
            Some(favorite) => {
                favorite.account_id = imported.account_id;
                favorite.name = imported.name;
                favorite.amount = imported.amount;
                favorite.category = imported.category;
            },
            None => {
                self.favorites.insert(imported);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use crate::core::{Wallet, WalletError, PaymentStatus, AccountId, Money};

    const PHONE: &str = "+992925556644";
    const BALANCE: Money = 10_000_00;

    #[fixture]
    fn wallet() -> Wallet {
        Wallet::new()
    }

    /// A wallet with one funded account that made one payment.
    #[fixture]
    fn paid() -> (Wallet, AccountId, String) {
        let mut wallet = Wallet::new();
        let account_id = wallet.register_account(PHONE).unwrap().id;
        wallet.deposit(account_id, BALANCE).unwrap();
        let payment_id = wallet.pay(account_id, 1_000_00, "auto").unwrap().id.clone();
        return (wallet, account_id, payment_id);
    }

    fn balance(wallet: &Wallet, account_id: AccountId) -> Money {
        wallet.find_account_by_id(account_id).unwrap().balance
    }

    #[rstest]
    fn register_assigns_sequential_ids(mut wallet: Wallet) {
        let first = wallet.register_account("+992000000001").unwrap().id;
        let second = wallet.register_account("+992000000002").unwrap().id;

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(balance(&wallet, first), 0);
    }

    #[rstest]
    fn register_duplicate_phone(mut wallet: Wallet) {
        wallet.register_account(PHONE).unwrap();

        let res = wallet.register_account(PHONE);

        assert!(matches!(res, Err(WalletError::PhoneAlreadyRegistered)));
        assert_eq!(wallet.num_accounts(), 1);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn deposit_non_positive(mut wallet: Wallet, #[case] amount: Money) {
        let account_id = wallet.register_account(PHONE).unwrap().id;

        assert_eq!(wallet.deposit(account_id, amount), Err(WalletError::AmountMustBePositive));
        assert_eq!(balance(&wallet, account_id), 0);
    }

    #[rstest]
    fn deposit_past_max_balance(mut wallet: Wallet) {
        let account_id = wallet.register_account(PHONE).unwrap().id;
        wallet.deposit(account_id, Money::MAX).unwrap();

        assert_eq!(wallet.deposit(account_id, 1), Err(WalletError::BalanceOverflow));
        assert_eq!(balance(&wallet, account_id), Money::MAX);
    }

    #[rstest]
    fn deposit_unknown_account(mut wallet: Wallet) {
        assert_eq!(wallet.deposit(42, 100), Err(WalletError::AccountNotFound));
    }

    #[rstest]
    fn pay_debits_account(paid: (Wallet, AccountId, String)) {
        let (wallet, account_id, payment_id) = paid;
        let payment = wallet.find_payment_by_id(&payment_id).unwrap();

        assert_eq!(balance(&wallet, account_id), 9_000_00);
        assert_eq!(payment.account_id, account_id);
        assert_eq!(payment.amount, 1_000_00);
        assert_eq!(payment.category, "auto");
        assert_eq!(payment.status, PaymentStatus::InProgress);
    }

    #[rstest]
    #[case(0, WalletError::AmountMustBePositive)]
    #[case(-1, WalletError::AmountMustBePositive)]
    #[case(9_000_01, WalletError::InsufficientBalance)]
    fn pay_refused(paid: (Wallet, AccountId, String), #[case] amount: Money, #[case] expected: WalletError) {
        let (mut wallet, account_id, _) = paid;

        let res = wallet.pay(account_id, amount, "auto").map(|p| p.id.clone());

        assert_eq!(res, Err(expected));
        assert_eq!(balance(&wallet, account_id), 9_000_00);
        assert_eq!(wallet.num_payments(), 1);
    }

    #[rstest]
    fn pay_whole_balance(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, _) = paid;

        wallet.pay(account_id, 9_000_00, "rent").unwrap();

        assert_eq!(balance(&wallet, account_id), 0);
    }

    #[rstest]
    fn pay_unknown_account(mut wallet: Wallet) {
        let res = wallet.pay(7, 10, "auto").map(|p| p.id.clone());
        assert_eq!(res, Err(WalletError::AccountNotFound));
    }

    #[rstest]
    fn find_payment(paid: (Wallet, AccountId, String)) {
        let (wallet, _, payment_id) = paid;

        assert_eq!(wallet.find_payment_by_id(&payment_id).unwrap().id, payment_id);
        assert_eq!(wallet.find_payment_by_id("missing").map(|p| p.id.clone()),
            Err(WalletError::PaymentNotFound));
    }

    #[rstest]
    fn lookups_alias_the_store(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, _) = paid;

        wallet.find_account_by_id_mut(account_id).unwrap().balance = 5;

        assert_eq!(balance(&wallet, account_id), 5);
    }

    #[test]
    fn pay_then_reject_scenario() {
        let mut wallet = Wallet::new();
        let account_id = wallet.register_account("+992000000001").unwrap().id;
        wallet.deposit(account_id, 100000).unwrap();
        let payment_id = wallet.pay(account_id, 50000, "food").unwrap().id.clone();

        assert_eq!(balance(&wallet, account_id), 50000);
        assert_eq!(wallet.num_payments(), 1);
        assert_eq!(wallet.find_payment_by_id(&payment_id).unwrap().status, PaymentStatus::InProgress);

        wallet.reject(&payment_id).unwrap();

        assert_eq!(balance(&wallet, account_id), 100000);
        assert_eq!(wallet.find_payment_by_id(&payment_id).unwrap().status, PaymentStatus::Fail);
    }

    #[rstest]
    fn reject_twice_credits_once(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, payment_id) = paid;

        wallet.reject(&payment_id).unwrap();
        let res = wallet.reject(&payment_id);

        assert_eq!(res, Err(WalletError::PaymentAlreadyFinalized));
        assert_eq!(balance(&wallet, account_id), BALANCE);
    }

    #[rstest]
    fn reject_credit_past_max_balance(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, payment_id) = paid;
        let topped_up = Money::MAX - 9_000_00;
        wallet.deposit(account_id, topped_up).unwrap();

        assert_eq!(wallet.reject(&payment_id), Err(WalletError::BalanceOverflow));
        assert_eq!(balance(&wallet, account_id), Money::MAX);
        assert_eq!(wallet.find_payment_by_id(&payment_id).unwrap().status, PaymentStatus::InProgress);
    }

    #[rstest]
    fn reject_unknown_payment(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, _) = paid;

        assert_eq!(wallet.reject("missing"), Err(WalletError::PaymentNotFound));
        assert_eq!(balance(&wallet, account_id), 9_000_00);
    }

    #[rstest]
    fn reject_payment_of_missing_account(paid: (Wallet, AccountId, String)) {
        let (mut wallet, _, payment_id) = paid;
        wallet.find_payment_by_id_mut(&payment_id).unwrap().account_id = 99;

        assert_eq!(wallet.reject(&payment_id), Err(WalletError::AccountNotFound));
        assert_eq!(wallet.find_payment_by_id(&payment_id).unwrap().status, PaymentStatus::InProgress);
    }

    #[rstest]
    fn repeat_makes_new_payment(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, payment_id) = paid;
        wallet.reject(&payment_id).unwrap();

        let repeated = wallet.repeat(&payment_id).unwrap().clone();
        let original = wallet.find_payment_by_id(&payment_id).unwrap();

        assert_ne!(repeated.id, original.id);
        assert_eq!(repeated.account_id, original.account_id);
        assert_eq!(repeated.amount, original.amount);
        assert_eq!(repeated.category, original.category);
        assert_eq!(repeated.status, PaymentStatus::InProgress);
        assert_eq!(balance(&wallet, account_id), 9_000_00);
    }

    #[rstest]
    fn repeat_unknown_payment(paid: (Wallet, AccountId, String)) {
        let (mut wallet, _, _) = paid;
        let res = wallet.repeat("missing").map(|p| p.id.clone());
        assert_eq!(res, Err(WalletError::PaymentNotFound));
    }

    #[rstest]
    fn repeat_without_funds(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, payment_id) = paid;
        wallet.pay(account_id, 8_500_00, "rent").unwrap();

        let res = wallet.repeat(&payment_id).map(|p| p.id.clone());

        assert_eq!(res, Err(WalletError::InsufficientBalance));
    }

    #[rstest]
    fn favorite_copies_payment(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, payment_id) = paid;

        let favorite = wallet.favorite_payment(&payment_id, "car").unwrap().clone();

        assert_ne!(favorite.id, payment_id);
        assert_eq!(favorite.account_id, account_id);
        assert_eq!(favorite.name, "car");
        assert_eq!(favorite.amount, 1_000_00);
        assert_eq!(favorite.category, "auto");
        assert_eq!(wallet.find_favorite_by_id(&favorite.id).unwrap(), &favorite);
    }

    #[rstest]
    fn favorite_duplicate_name(paid: (Wallet, AccountId, String)) {
        let (mut wallet, _, payment_id) = paid;
        wallet.favorite_payment(&payment_id, "car").unwrap();

        let res = wallet.favorite_payment(&payment_id, "car").map(|f| f.id.clone());

        assert_eq!(res, Err(WalletError::FavoriteAlreadyRegistered));
        assert_eq!(wallet.num_favorites(), 1);
        assert!(wallet.favorite_payment(&payment_id, "Car").is_ok());
    }

    #[rstest]
    fn favorite_unknown_payment(paid: (Wallet, AccountId, String)) {
        let (mut wallet, _, _) = paid;
        let res = wallet.favorite_payment("missing", "car").map(|f| f.id.clone());
        assert_eq!(res, Err(WalletError::PaymentNotFound));
    }

    #[rstest]
    fn favorite_is_detached_from_payment(paid: (Wallet, AccountId, String)) {
        let (mut wallet, _, payment_id) = paid;
        let favorite_id = wallet.favorite_payment(&payment_id, "car").unwrap().id.clone();

        wallet.reject(&payment_id).unwrap();
        wallet.find_payment_by_id_mut(&payment_id).unwrap().amount = 1;

        let favorite = wallet.find_favorite_by_id(&favorite_id).unwrap();
        assert_eq!(favorite.amount, 1_000_00);
    }

    #[rstest]
    fn pay_from_favorite_uses_stored_fields(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, payment_id) = paid;
        let favorite_id = wallet.favorite_payment(&payment_id, "car").unwrap().id.clone();

        let payment = wallet.pay_from_favorite(&favorite_id).unwrap().clone();

        assert_ne!(payment.id, payment_id);
        assert_ne!(payment.id, favorite_id);
        assert_eq!(payment.account_id, account_id);
        assert_eq!(payment.amount, 1_000_00);
        assert_eq!(payment.category, "auto");
        assert_eq!(payment.status, PaymentStatus::InProgress);
        assert_eq!(balance(&wallet, account_id), 8_000_00);
    }

    #[rstest]
    fn pay_from_unknown_favorite(paid: (Wallet, AccountId, String)) {
        let (mut wallet, _, payment_id) = paid;

        // a payment id is not a favorite id
        let res = wallet.pay_from_favorite(&payment_id).map(|p| p.id.clone());

        assert_eq!(res, Err(WalletError::FavoriteNotFound));
    }

    #[rstest]
    fn account_history(paid: (Wallet, AccountId, String)) {
        let (mut wallet, account_id, payment_id) = paid;
        let other = wallet.register_account("+992000000002").unwrap().id;
        wallet.deposit(other, 50).unwrap();
        wallet.pay(other, 20, "food").unwrap();
        let second_id = wallet.pay(account_id, 10, "food").unwrap().id.clone();

        let history = wallet.export_account_history(account_id).unwrap();

        let ids: Vec<_> = history.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![payment_id.as_str(), second_id.as_str()]);
        assert_eq!(wallet.export_account_history(99), Err(WalletError::AccountNotFound));
    }

    #[rstest]
    fn money_is_conserved(mut wallet: Wallet) {
        let first = wallet.register_account("+992000000001").unwrap().id;
        let second = wallet.register_account("+992000000002").unwrap().id;
        wallet.deposit(first, 700).unwrap();
        wallet.deposit(second, 300).unwrap();

        let rejected = wallet.pay(first, 200, "food").unwrap().id.clone();
        let kept = wallet.pay(second, 100, "taxi").unwrap().id.clone();
        wallet.repeat(&kept).unwrap();
        let favorite = wallet.favorite_payment(&rejected, "lunch").unwrap().id.clone();
        wallet.pay_from_favorite(&favorite).unwrap();
        wallet.reject(&rejected).unwrap();
        let _ = wallet.reject(&rejected);
        let _ = wallet.pay(second, 1_000, "car");

        let balances: Money = wallet.accounts().map(|a| a.balance).sum();
        let in_progress: Money = wallet.payments()
            .filter(|p| p.status == PaymentStatus::InProgress)
            .map(|p| p.amount)
            .sum();
        assert_eq!(balances + in_progress, 1_000);
        assert!(wallet.accounts().all(|a| a.balance >= 0));
    }

    #[rstest]
    fn merge_keeps_counter_monotonic(mut wallet: Wallet) {
        wallet.register_account("+992000000001").unwrap();
        wallet.register_account("+992000000002").unwrap();
        wallet.register_account("+992000000003").unwrap();

        wallet.merge_account(crate::core::Account::new(2, "+992000000009"));

        assert_eq!(wallet.find_account_by_id(2).unwrap().phone, "+992000000009");
        assert_eq!(wallet.register_account("+992000000004").unwrap().id, 4);
    }
}
