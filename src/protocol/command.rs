#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    ProjectOpen,
    ProjectSave,
    SetAdd,
    SetGetBy,
    SetGet,
    SetRemove,
    SetSize,
    SetClear,
    SetDiff,
    SetProjects,
    SetContexts,
    SetLocales,
    SetConvertToIcu,
    SetConvertToPlural,
    RepoLoad,
    RepoSave,
    DbImport,
    DbQuery,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "project.open" => Command::ProjectOpen,
            "project.save" => Command::ProjectSave,
            "set.add" => Command::SetAdd,
            "set.get_by" => Command::SetGetBy,
            "set.get" => Command::SetGet,
            "set.remove" => Command::SetRemove,
            "set.size" => Command::SetSize,
            "set.clear" => Command::SetClear,
            "set.diff" => Command::SetDiff,
            "set.projects" => Command::SetProjects,
            "set.contexts" => Command::SetContexts,
            "set.locales" => Command::SetLocales,
            "set.convert_to_icu" => Command::SetConvertToIcu,
            "set.convert_to_plural" => Command::SetConvertToPlural,
            "repo.load" => Command::RepoLoad,
            "repo.save" => Command::RepoSave,
            "db.import" => Command::DbImport,
            "db.query" => Command::DbQuery,
            _ => Command::Unknown,
        }
    }
}

impl Command {
    pub fn is_set_command(self) -> bool {
        matches!(
            self,
            Command::SetAdd
                | Command::SetGetBy
                | Command::SetGet
                | Command::SetRemove
                | Command::SetSize
                | Command::SetClear
                | Command::SetDiff
                | Command::SetProjects
                | Command::SetContexts
                | Command::SetLocales
                | Command::SetConvertToIcu
                | Command::SetConvertToPlural
        )
    }
}
