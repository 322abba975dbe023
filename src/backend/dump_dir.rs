use std::{fs, io, path::{Path, PathBuf}};

use log::info;

use crate::backend::codec::{self, Record};
use crate::backend::interface::{Result, WalletStore};
use crate::core::{Account, Favorite, Payment, Wallet};

pub const DUMP_EXTENSION: &str = "dump";
pub const RECORD_SEPARATOR: char = '\n';

/// Directory holding one `<kind>.dump` file per non-empty collection,
/// one record per line.
pub struct DumpDir {
    root: PathBuf,
}

impl DumpDir {
    pub fn new(root: impl AsRef<Path>) -> DumpDir {
        DumpDir { root: root.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn file_path<T: Record>(&self) -> PathBuf {
        self.root.join(format!("{}.{}", T::KIND, DUMP_EXTENSION))
    }

    fn write_records<'a, T: Record + 'a>(&self, records: impl ExactSizeIterator<Item = &'a T>) -> Result<()> {
        if records.len() == 0 {
            return Ok(());
        }
        let count = records.len();
        fs::write(self.file_path::<T>(), codec::encode_all(records, RECORD_SEPARATOR))?;
        info!("exported {} {} to {}", count, T::KIND, self.root.display());
        Ok(())
    }

    /// A missing file reads as no records.
    fn read_records<T: Record>(&self) -> Result<Vec<T>> {
        match fs::read_to_string(self.file_path::<T>()) {
            Ok(text) => Ok(codec::decode_all(&text, RECORD_SEPARATOR)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl WalletStore for DumpDir {
    fn load_into(&self, wallet: &mut Wallet) -> Result<()> {
        let accounts = self.read_records::<Account>()?;
        info!("importing {} accounts from {}", accounts.len(), self.root.display());
        for account in accounts {
            wallet.merge_account(account);
        }

        let payments = self.read_records::<Payment>()?;
        info!("importing {} payments from {}", payments.len(), self.root.display());
        for payment in payments {
            wallet.merge_payment(payment);
        }

        let favorites = self.read_records::<Favorite>()?;
        info!("importing {} favorites from {}", favorites.len(), self.root.display());
        for favorite in favorites {
            wallet.merge_favorite(favorite);
        }
        Ok(())
    }

    fn save(&self, wallet: &Wallet) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        self.write_records(wallet.accounts())?;
        self.write_records(wallet.favorites())?;
        self.write_records(wallet.payments())?;
        Ok(())
    }
}

impl Wallet {
    /// Writes the wallet to `dir`, creating it when missing.
    /// Files of non-empty collections are overwritten.
    pub fn export(&self, dir: impl AsRef<Path>) -> Result<()> {
        DumpDir::new(dir).save(self)
    }

    /// Merges the dump in `dir` into the wallet: records whose id is
    /// already known update that entity in place, the rest are added.
    pub fn import(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        DumpDir::new(dir).load_into(self)
    }
}
