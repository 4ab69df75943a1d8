use commander_core::Section;
use commander_runtime::{BrowserHost, Host, HostError};

/// Opens links in the browser, or only prints them with `--no-open`.
pub struct TerminalHost {
    browser: Option<BrowserHost>,
}

impl TerminalHost {
    pub fn new(open_links: bool) -> Self {
        Self { browser: open_links.then_some(BrowserHost) }
    }
}

impl Host for TerminalHost {
    fn open_link(&self, url: &str) -> Result<(), HostError> {
        match &self.browser {
            Some(browser) => browser.open_link(url),
            None => {
                println!("  -> {url}");
                Ok(())
            }
        }
    }

    fn navigate(&self, section: Section) -> Result<(), HostError> {
        println!("  [{}]", section.title());
        Ok(())
    }

    fn close_dialog(&self) -> Result<(), HostError> {
        println!("  [chat closed]");
        Ok(())
    }
}
