//! Console host: drives the navigation document with line commands and prints
//! both panes after every change.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;

use edgelist::classify::TypeTable;
use edgelist::config::AppConfig;
use edgelist::ops::{self, FileOperations, Operation, StdFileOperations};
use edgelist::paths;
use edgelist::prefs::TomlPreferences;
use edgelist::size;
use edgelist::{
    FileItem, HierarchyTransition, HistorySort, ItemRole, Location, NavigationState, PaneKind, Services, SortField,
};

const HELP: &str = "\
commands:
  ls                      show both panes
  cd <path>               go to a folder (or ::bookmarks, ::history, ::drives)
  open <n> | nav <n>      descend into file-pane / navigation-pane row n
  back | up | last        previous checkpoint, parent folder, last location
  sel <a> [b] | all <a> <b> | unsel
  fav [n]                 bookmark the current folder or row n; inside Bookmarks remove row n
  arrange <drag> <drop>   reorder bookmarks
  sort <name|type|date|size> [rev]
  hidden <on|off>
  hsort <off|name|type|date|size> [rev]
  clearhist | refresh
  size <n>                size of the working set at row n
  copy <n> <dir> | move <n> <dir> | link <n> <dir> | del <n> | ren <n> <name>
  cmd <n>                 open command configured for row n
  quit";

struct Host {
    state: NavigationState,
    transition: HierarchyTransition,
    config: AppConfig,
}

impl Host {
    /// Navigate, pushing a checkpoint when leaving an ordinary folder.
    fn go(&mut self, target: Location) {
        if let Some(here) = self.state.current().folder() {
            let here = here.to_path_buf();
            self.transition.go_forward(0, here);
        }
        self.state.set_current_directory(target);
    }

    fn descend(&mut self, pane: PaneKind, index: usize) -> Result<()> {
        if !self.state.movable_to_lower(pane, index)? {
            println!("row {} cannot be opened", index);
            return Ok(());
        }
        if let Some(here) = self.state.current().folder() {
            let here = here.to_path_buf();
            self.transition.go_forward(0, here);
        }
        self.state.move_to_lower(pane, index)?;
        Ok(())
    }

    fn working_set(&self, index: usize) -> Result<Vec<FileItem>> {
        let mut set = Vec::new();
        self.state.set_operator(Some(index), PaneKind::File, &mut set)?;
        Ok(set)
    }

    fn run_op(&mut self, op: Operation, index: usize, dest: Option<&Path>) -> Result<()> {
        let set = self.working_set(index)?;
        let ok = ops::apply(&StdFileOperations, op, &set, dest)?;
        println!("{:?}: {}", op, if ok { "done" } else { "failed" });
        self.state.refresh();
        Ok(())
    }

    /// Returns `false` when the session should end.
    fn execute(&mut self, line: &str) -> Result<bool> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(true);
        };
        let args: Vec<&str> = words.collect();
        let index = |i: usize| -> Result<usize> {
            let word = args.get(i).ok_or_else(|| anyhow::anyhow!("missing row number"))?;
            Ok(word.parse()?)
        };

        match command {
            "quit" | "exit" => return Ok(false),
            "help" | "?" => println!("{}", HELP),
            "ls" => {}
            "cd" => {
                let target = line.trim_start()[command.len()..].trim();
                self.go(Location::from_path(target));
            }
            "open" => self.descend(PaneKind::File, index(0)?)?,
            "nav" => self.descend(PaneKind::Navigation, index(0)?)?,
            "back" => match self.transition.go_back() {
                Some(path) => self.state.set_current_directory(path),
                None => println!("nothing to go back to"),
            },
            "up" => {
                if let Some(parent) = self.state.current().folder().and_then(paths::parent) {
                    self.state.set_current_directory(parent);
                }
            }
            "last" => {
                if !self.state.return_to_last() {
                    println!("no previous location");
                }
            }
            "sel" => {
                let front = index(0)?;
                let back = if args.len() > 1 { index(1)? } else { front };
                self.state.select_file(front, back, PaneKind::File, false)?;
            }
            "all" => self.state.select_file(index(0)?, index(1)?, PaneKind::File, true)?,
            "unsel" => self.state.unselect(PaneKind::File),
            "fav" => {
                let row = if args.is_empty() { None } else { Some(index(0)?) };
                let path = match (row, self.state.current().folder()) {
                    (Some(i), _) => self.state.file_pane().get(i)?.path.clone(),
                    (None, Some(here)) => here.to_path_buf(),
                    (None, None) => {
                        println!("not in a folder");
                        return Ok(true);
                    }
                };
                if !self.state.add_or_remove_favorite(&path, PaneKind::File, row)? {
                    println!("bookmarks unchanged");
                }
            }
            "arrange" => {
                if !self.state.arrange_favorites(Some(index(0)?), Some(index(1)?))? {
                    println!("nothing to arrange");
                }
            }
            "sort" => {
                let field = parse_field(args.first().copied().unwrap_or("name"));
                self.state.set_sort(field, args.get(1) == Some(&"rev"));
            }
            "hidden" => self.state.set_show_hidden(args.first() == Some(&"on")),
            "hsort" => {
                let mode = args.first().copied().unwrap_or("off");
                self.state.set_history_sort(HistorySort {
                    enabled: mode != "off",
                    field: parse_field(mode),
                    reverse: args.get(1) == Some(&"rev"),
                });
            }
            "clearhist" => self.state.clear_history(),
            "refresh" => self.state.refresh(),
            "size" => {
                let paths: Vec<PathBuf> = self
                    .working_set(index(0)?)?
                    .into_iter()
                    .filter(|item| item.role == ItemRole::Entry)
                    .map(|item| item.path)
                    .collect();
                let estimate = size::total_size(&paths, Instant::now() + self.config.size_timeout);
                println!("{}", estimate);
                return Ok(true);
            }
            "copy" | "move" | "link" => {
                let op = match command {
                    "copy" => Operation::Copy,
                    "move" => Operation::Move,
                    _ => Operation::CreateLink,
                };
                let dest = args.get(1).map(PathBuf::from);
                self.run_op(op, index(0)?, dest.as_deref())?;
            }
            "del" => self.run_op(Operation::Delete, index(0)?, None)?,
            "ren" => {
                let item = self.state.file_pane().get(index(0)?)?.clone();
                let name = args.get(1).ok_or_else(|| anyhow::anyhow!("missing new name"))?;
                if !StdFileOperations.rename(&item.path, name) {
                    println!("rename failed");
                }
                self.state.refresh();
            }
            "cmd" => {
                let item = self.state.file_pane().get(index(0)?)?;
                match self.state.classifier().open_command_for(&item.extension()) {
                    Some(command) => println!("{}", command.replace("%1", &paths::quote(&item.path))),
                    None => println!("no command for .{}", item.extension()),
                }
                return Ok(true);
            }
            other => {
                println!("unknown command '{}', try help", other);
                return Ok(true);
            }
        }
        print_panes(&self.state);
        Ok(true)
    }
}

fn parse_field(word: &str) -> SortField {
    match word {
        "type" => SortField::Type,
        "date" => SortField::Date,
        "size" => SortField::Size,
        _ => SortField::Name,
    }
}

fn row_text(index: usize, item: &FileItem) -> String {
    match item.role {
        ItemRole::Separator(_) => format!("{:>3}  ----------------", index),
        ItemRole::Empty => format!("{:>3}  {}", index, item.display_name),
        ItemRole::VirtualRoot(_) => format!("{:>3}  [{}]", index, item.display_name),
        ItemRole::Entry => {
            let mark = if item.selected { '*' } else { ' ' };
            let kind = if item.is_directory() { "/" } else { "" };
            let link = if item.is_link() { " ->" } else { "" };
            if item.is_directory() {
                format!("{:>3} {}{}{}{}", index, mark, item.display_name, kind, link)
            } else {
                format!("{:>3} {}{}{}  {}", index, mark, item.display_name, link, size::format_size(item.size))
            }
        }
    }
}

fn print_panes(state: &NavigationState) {
    println!("== {} ==", state.current());
    for (i, item) in state.nav_pane().iter().enumerate() {
        println!("{}", row_text(i, item));
    }
    println!("-- files ({} selected) --", state.file_pane().selected_count());
    for (i, item) in state.file_pane().iter().enumerate() {
        println!("{}", row_text(i, item));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("edgelist=info".parse()?),
        )
        .init();

    let config_dir = AppConfig::default_dir();
    let mut prefs = TomlPreferences::load(&AppConfig::prefs_path(&config_dir))?;
    let config = AppConfig::from_prefs(&config_dir, &prefs);
    tracing::info!("Config directory: {}", config_dir.display());

    let services = Services {
        classifier: Box::new(TypeTable::from_prefs(&prefs)),
        ..Services::system(config.mount_cache)
    };
    let state = NavigationState::load(&config, &prefs, services)?;

    let start = match std::env::args().nth(1) {
        Some(arg) => Location::from_path(arg),
        None => Location::from_path(std::env::current_dir()?),
    };

    let mut host = Host { state, transition: HierarchyTransition::new(), config };
    host.state.set_current_directory(start);
    print_panes(&host.state);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match host.execute(line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("error: {:#}", e),
        }
    }

    host.state.save(&host.config, &mut prefs)?;
    prefs.save()?;
    Ok(())
}
