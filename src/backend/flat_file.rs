use std::{fs, path::{Path, PathBuf}};

use log::info;

use crate::backend::codec;
use crate::backend::interface::{Result, WalletStore};
use crate::core::{Account, Wallet};

pub const ACCOUNT_SEPARATOR: char = '|';

/// Single file listing accounts only, each record followed by `|`.
///
/// Loading registers every listed phone as a new account and deposits
/// its balance, so ids are assigned afresh by the receiving wallet.
pub struct FlatFile {
    path: PathBuf,
}

impl FlatFile {
    pub fn new(path: impl AsRef<Path>) -> FlatFile {
        FlatFile { path: path.as_ref().to_path_buf() }
    }
}

impl WalletStore for FlatFile {
    fn load_into(&self, wallet: &mut Wallet) -> Result<()> {
        let text = fs::read_to_string(&self.path)?;
        let accounts: Vec<Account> = codec::decode_all(&text, ACCOUNT_SEPARATOR);
        info!("importing {} accounts from {}", accounts.len(), self.path.display());

        for imported in accounts {
            let account_id = wallet.register_account(&imported.phone)?.id;
            if imported.balance > 0 {
                wallet.deposit(account_id, imported.balance)?;
            }
        }
        Ok(())
    }

    fn save(&self, wallet: &Wallet) -> Result<()> {
        fs::write(&self.path, codec::encode_all(wallet.accounts(), ACCOUNT_SEPARATOR))?;
        info!("exported {} accounts to {}", wallet.num_accounts(), self.path.display());
        Ok(())
    }
}

impl Wallet {
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        FlatFile::new(path).save(self)
    }

    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        FlatFile::new(path).load_into(self)
    }
}
