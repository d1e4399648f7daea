use tracing::debug;

use crate::config::Config;
use crate::dns_provider::DnsProvider;
use crate::errors::DnsError;
use crate::prompter::Prompter;
use crate::session::Session;
use crate::workflows;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    LookupZone,
    RenameCname,
    DisableProxyAll,
    DeleteAllRecords,
    DeleteZone,
    EditAddressRecord,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<MenuChoice> {
        match input.trim() {
            "1" => Some(MenuChoice::LookupZone),
            "2" => Some(MenuChoice::RenameCname),
            "3" => Some(MenuChoice::DisableProxyAll),
            "4" => Some(MenuChoice::DeleteAllRecords),
            "5" => Some(MenuChoice::DeleteZone),
            "6" => Some(MenuChoice::EditAddressRecord),
            "7" | "exit" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "\
1) Look up zone
2) Rename CNAME record
3) Disable proxy on all records
4) Delete all records
5) Delete zone
6) Edit A/AAAA record
7) Exit";

pub struct CLIProgram<T, P>
where
    T: DnsProvider,
    P: Prompter,
{
    api: T,
    prompter: P,
    session: Session,
    confirm_destructive: bool,
}

impl<T, P> CLIProgram<T, P>
where
    T: DnsProvider,
    P: Prompter,
{
    pub fn new(api: T, prompter: P, config: &Config) -> CLIProgram<T, P> {
        CLIProgram {
            api,
            prompter,
            session: Session::new(),
            confirm_destructive: config.confirm_destructive,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Shows the menu until the operator picks exit or closes the prompt.
    pub async fn run(&mut self) {
        loop {
            println!();
            match self.session.zone() {
                Some(zone) => println!("Zone: {} ({})", zone.name, zone.id),
                None => println!("Zone: none selected"),
            }
            println!("{}", MENU);

            let input = match self.prompter.text("Choose an option:") {
                Ok(input) => input,
                Err(err) => {
                    debug!("Menu prompt closed: {}", err);
                    break;
                }
            };

            let Some(choice) = MenuChoice::parse(&input) else {
                println!("Invalid option: {}", input.trim());
                continue;
            };
            if choice == MenuChoice::Exit {
                break;
            }

            debug!("Running {:?}", choice);
            if let Err(err) = self.dispatch(choice).await {
                report_error(&err);
            }
        }
        println!("Bye");
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> Result<(), DnsError> {
        let api = &self.api;
        let prompter = &mut self.prompter;
        let session = &mut self.session;

        match choice {
            MenuChoice::LookupZone => {
                workflows::lookup_zone(api, session, prompter).await?;
            }
            MenuChoice::RenameCname => {
                workflows::rename_cname(api, session, prompter).await?;
            }
            MenuChoice::DisableProxyAll => {
                workflows::disable_proxy_all(api, session).await?;
            }
            MenuChoice::DeleteAllRecords => {
                workflows::delete_all_records(api, session, prompter, self.confirm_destructive)
                    .await?;
            }
            MenuChoice::DeleteZone => {
                workflows::delete_zone(api, session, prompter).await?;
            }
            MenuChoice::EditAddressRecord => {
                workflows::edit_address_record(api, session, prompter).await?;
            }
            MenuChoice::Exit => {}
        }
        Ok(())
    }
}

fn report_error(err: &DnsError) {
    match err {
        DnsError::Prompt(_) => println!("Cancelled"),
        _ => {
            println!("Error: {}", err);
            if let Some(raw) = err.raw_response() {
                println!("Response: {}", raw);
            }
        }
    }
}
