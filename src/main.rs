use reqbench::entry;
use reqbench::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
