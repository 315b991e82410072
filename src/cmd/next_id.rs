use crate::store::RecordStore;
use clap::Args;

/// Print the id the next new user would be given
#[derive(Args, Debug)]
pub struct NextIdCommand {}

impl NextIdCommand {
    pub fn exec(&self, store: &impl RecordStore) -> anyhow::Result<()> {
        println!("{}", store.next_id()?);
        Ok(())
    }
}
