use anyhow::Result;

use crate::app::App;

pub fn run() -> Result<()> {
    App::init()?.logout()
}
