//! Menu driver.
//!
//! [`App`] owns the console streams and borrows the database for the whole
//! session. Menu actions return `Result`; `App::report` decides which
//! failures end the session (console I/O, end of input) and which are
//! printed to the error stream before returning to the enclosing menu.

use std::io::{self, BufRead, Write};

use cafe_accounts::{AccountError, AuthorizedUser};
use cafe_db::Database;
use cafe_menu::MenuError;
use cafe_types::{ItemUpdate, NewMenuItem, NewUser, ParsePriceError, Price, UserType};
use thiserror::Error;

use crate::console::{Console, ConsoleError};

/// Errors raised by menu actions.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Menu(#[from] MenuError),
    #[error(transparent)]
    Price(#[from] ParsePriceError),
}

impl CliError {
    /// Whether the session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Console(_) | Self::Io(_))
    }
}

type Action<A> = fn(&mut A) -> Result<(), CliError>;

/// An interactive session over one database connection.
pub struct App<'db, R, W, E> {
    db: &'db Database,
    console: Console<R, W>,
    errors: E,
    default_user_type: UserType,
}

impl<'db, R, W, E> App<'db, R, W, E>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    pub fn new(db: &'db Database, input: R, output: W, errors: E) -> Self {
        Self {
            db,
            console: Console::new(input, output),
            errors,
            default_user_type: UserType::default(),
        }
    }

    /// Sets the role tag for accounts created in this session.
    pub fn with_default_user_type(mut self, user_type: UserType) -> Self {
        self.default_user_type = user_type;
        self
    }

    /// Returns the output and error streams.
    pub fn into_parts(self) -> (W, E) {
        (self.console.into_output(), self.errors)
    }

    /// Runs the main menu until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns `CliError` only for console I/O failures.
    pub fn run(&mut self) -> Result<(), CliError> {
        match self.main_menu() {
            Err(CliError::Console(ConsoleError::InputClosed)) => {
                tracing::info!("input closed, ending session");
                Ok(())
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> Result<(), CliError> {
        loop {
            self.say_all(&["MAIN MENU", "---------", "1. Create user", "2. Log in", "9. < EXIT"])?;

            let authorised = match self.console.read_choice()? {
                1 => {
                    let outcome = self.create_user();
                    self.report(outcome)?;
                    None
                }
                2 => {
                    let outcome = self.log_in();
                    self.report(outcome)?.flatten()
                }
                9 => return Ok(()),
                _ => {
                    self.say("Unrecognized choice!")?;
                    None
                }
            };

            if let Some(user) = authorised {
                self.user_menu(&user)?;
            }
        }
    }

    fn user_menu(&mut self, user: &AuthorizedUser) -> Result<(), CliError> {
        loop {
            self.say_all(&[
                "MAIN MENU",
                "---------",
                "1. Goto Menu",
                "2. Update Profile",
                "3. Place a Order",
                "4. Update a Order",
                ".........................",
                "9. Log out",
            ])?;

            match self.console.read_choice()? {
                1 => self.item_menu(user)?,
                2 => self.unavailable("Update Profile")?,
                3 => self.unavailable("Place a Order")?,
                4 => self.unavailable("Update a Order")?,
                9 => {
                    tracing::info!(login = %user.login, "logged out");
                    return Ok(());
                }
                _ => self.say("Unrecognized choice!")?,
            }
        }
    }

    fn item_menu(&mut self, user: &AuthorizedUser) -> Result<(), CliError> {
        loop {
            self.say_all(&[
                "Menu List",
                "---------",
                "1. Search Item by name",
                "2. Search Item by type",
                "---------",
                "Manager Only",
                "6. Add items",
                "7. Delete items",
                "8. Update items",
                "9. Go back to main menu",
            ])?;

            match self.console.read_choice()? {
                1 => self.repeat("search another item", Self::search_by_name)?,
                2 => self.repeat("search another item", Self::search_by_type)?,
                6..=8 if !user.user_type.can_manage_menu() => {
                    tracing::info!(login = %user.login, "refused manager-only action");
                    self.say("Only managers can add, delete or update items.")?;
                }
                6 => self.repeat("add more items", Self::add_item)?,
                7 => self.repeat("delete more items", Self::delete_items)?,
                8 => self.repeat("update more items", Self::update_items)?,
                9 => return Ok(()),
                _ => self.say("Unrecognized choice!")?,
            }
        }
    }

    fn create_user(&mut self) -> Result<(), CliError> {
        let login = self.console.read_line("\tEnter user login: ")?;
        let password = self.console.read_line("\tEnter user password: ")?;
        let phone_num = self.console.read_line("\tEnter user phone: ")?;

        cafe_accounts::create_user(
            self.db,
            &NewUser {
                login,
                password,
                phone_num,
                user_type: self.default_user_type,
            },
        )?;
        self.say("User successfully created!")?;
        Ok(())
    }

    fn log_in(&mut self) -> Result<Option<AuthorizedUser>, CliError> {
        let login = self.console.read_line("\tEnter user login: ")?;
        let password = self.console.read_line("\tEnter user password: ")?;

        let user = cafe_accounts::log_in(self.db, &login, &password)?;
        match &user {
            Some(user) => self.say(&format!("Welcome, {} ({})!", user.login, user.user_type))?,
            None => self.say("Invalid login or password.")?,
        }
        Ok(user)
    }

    fn search_by_name(&mut self) -> Result<(), CliError> {
        let name = self
            .console
            .read_line("Enter the name of item you are looking for: ")?;
        let db = self.db;
        let found = cafe_menu::print_items_by_name(db, &name, self.console.output())?;
        self.finish_search(found)
    }

    fn search_by_type(&mut self) -> Result<(), CliError> {
        let item_type = self
            .console
            .read_line("Enter the type of item you are looking for: ")?;
        let db = self.db;
        let found = cafe_menu::print_items_by_type(db, &item_type, self.console.output())?;
        self.finish_search(found)
    }

    fn finish_search(&mut self, found: usize) -> Result<(), CliError> {
        if found == 0 {
            self.say("No items found.")?;
        }
        self.say("----------Search Finished-----------")?;
        Ok(())
    }

    fn add_item(&mut self) -> Result<(), CliError> {
        self.say_all(&["------------------------", "-------ADD ITEMS--------"])?;
        let item_name = self.console.read_line("Enter the Name of Item: ")?;
        let item_type = self.console.read_line("Enter the type of Item: ")?;
        let price: Price = self.console.read_line("Enter the price of Item: ")?.parse()?;
        let description = self.console.read_line("Enter the description of Item: ")?;
        let image_url = self.console.read_line("Enter the URL of image: ")?;

        cafe_menu::add_item(
            self.db,
            &NewMenuItem {
                item_name,
                item_type,
                price,
                description,
                image_url,
            },
        )?;
        self.say("Item Added!")?;
        Ok(())
    }

    fn delete_items(&mut self) -> Result<(), CliError> {
        self.say_all(&["---------------------------", "-------DELETE ITEMS--------"])?;
        let name = self.console.read_line("Enter the name of Item to delete: ")?;

        match cafe_menu::delete_items(self.db, &name)? {
            0 => self.say(&format!("No item named {name:?}."))?,
            removed => self.say(&format!("{removed} item(s) removed!"))?,
        }
        Ok(())
    }

    fn update_items(&mut self) -> Result<(), CliError> {
        self.say_all(&["---------------------------", "-------UPDATE ITEMS--------"])?;
        let name = self.console.read_line("Enter the name of Item to update: ")?;

        match cafe_menu::count_items_by_name(self.db, &name)? {
            0 => {
                self.say(&format!("No item named {name:?}."))?;
                return Ok(());
            }
            1 => {}
            shared => self.say(&format!(
                "{shared} items share this name; all of them will be updated."
            ))?,
        }

        self.say_all(&[
            "Which one should be updated?",
            "1. Item Name 2. Item Type 3. Price 4. Description 5. image URL",
        ])?;
        let update = match self.console.read_choice()? {
            1 => ItemUpdate::Name(self.console.read_line("Enter the new name of Item: ")?),
            2 => ItemUpdate::Type(self.console.read_line("Enter the new type of Item: ")?),
            3 => ItemUpdate::Price(self.console.read_line("Enter the new price of Item: ")?.parse()?),
            4 => ItemUpdate::Description(
                self.console
                    .read_line("Enter the new description of Item: ")?,
            ),
            5 => ItemUpdate::ImageUrl(self.console.read_line("Enter the new URL of image: ")?),
            _ => {
                self.say("Invalid Value")?;
                return Ok(());
            }
        };

        let updated = cafe_menu::update_items(self.db, &name, &update)?;
        self.say(&format!("{updated} item(s) updated!"))?;
        Ok(())
    }

    fn unavailable(&mut self, feature: &str) -> Result<(), CliError> {
        tracing::debug!(feature, "unimplemented menu option selected");
        self.say(&format!("{feature} is not available yet."))?;
        Ok(())
    }

    /// Runs `action`, then asks whether to run it again.
    fn repeat(&mut self, again: &str, action: Action<Self>) -> Result<(), CliError> {
        loop {
            let outcome = action(self);
            self.report(outcome)?;

            let question = format!("Do you want to {again}?");
            self.say_all(&[question.as_str(), "1. Yes 2. No (go back to menu)"])?;
            loop {
                match self.console.read_choice()? {
                    1 => break,
                    2 => return Ok(()),
                    _ => self.say("Unrecognized choice!")?,
                }
            }
        }
    }

    /// Passes fatal errors up; prints the rest to the error stream.
    fn report<T>(&mut self, outcome: Result<T, CliError>) -> Result<Option<T>, CliError> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "menu action failed");
                writeln!(self.errors, "{e}")?;
                Ok(None)
            }
        }
    }

    fn say(&mut self, line: &str) -> Result<(), CliError> {
        Ok(self.console.say(line)?)
    }

    fn say_all(&mut self, lines: &[&str]) -> Result<(), CliError> {
        for line in lines {
            self.console.say(line)?;
        }
        Ok(())
    }
}
