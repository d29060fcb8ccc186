use serde_json::{json, Value};

use crate::factory;
use crate::model::criteria::Criteria;
use crate::model::props::ResourceProps;
use crate::model::resource::Resource;
use crate::model::translation_set::TranslationSet;

use super::{get_field, get_str, Command, Reply, Session};

pub(super) fn resources_json<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Value {
    let props: Vec<ResourceProps> = resources.into_iter().map(Resource::to_props).collect();
    json!(props)
}

fn parse_resources(payload: &Value) -> Result<Vec<Resource>, String> {
    let arr = payload
        .get("resources")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "payload.resources must be an array".to_string())?;

    let mut out = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().cloned().enumerate() {
        match serde_json::from_value::<ResourceProps>(v) {
            Ok(p) => out.push(factory::new_resource(Some(p))),
            Err(e) => return Err(format!("invalid resource at index {i}: {e}")),
        }
    }
    Ok(out)
}

fn criteria(payload: &Value) -> Result<Criteria, String> {
    let c: Option<Criteria> = get_field(payload, "criteria")?;
    Ok(c.unwrap_or_default())
}

pub(super) fn handle(session: &mut Session, cmd: Command, payload: &Value) -> Reply {
    let set = &mut session.set;

    match cmd {
        Command::SetAdd => {
            let resources = parse_resources(payload)?;
            let changed = resources.into_iter().map(|r| set.add(r)).filter(|&c| c).count();
            Ok(json!({ "changed": changed, "size": set.size() }))
        }

        Command::SetGetBy => {
            let c = criteria(payload)?;
            Ok(json!({ "resources": resources_json(set.get_by(&c)) }))
        }

        Command::SetGet => {
            let hash_key = get_str(payload, "hashKey");
            let clean_key = get_str(payload, "cleanHashKey");
            let found = if !hash_key.is_empty() {
                set.get(hash_key)
            } else if !clean_key.is_empty() {
                set.get_clean(clean_key)
            } else {
                return Err("payload.hashKey or payload.cleanHashKey is required".into());
            };
            Ok(json!({ "resource": found.map(Resource::to_props) }))
        }

        Command::SetRemove => {
            let c = criteria(payload)?;
            Ok(json!({ "removed": set.remove(&c), "size": set.size() }))
        }

        Command::SetSize => Ok(json!({ "size": set.size() })),

        Command::SetClear => {
            set.clear();
            Ok(json!({ "size": 0 }))
        }

        Command::SetDiff => {
            let mut other = TranslationSet::new(Some(set.source_locale()));
            other.add_all(parse_resources(payload)?);
            let diff = set.diff(&other);
            Ok(json!({ "resources": resources_json(diff.iter()) }))
        }

        Command::SetProjects => Ok(json!({ "projects": set.get_projects() })),

        Command::SetContexts => {
            let project = get_str(payload, "project");
            Ok(json!({ "contexts": set.get_contexts(project) }))
        }

        Command::SetLocales => {
            let project = get_str(payload, "project");
            let context = payload.get("context").and_then(|v| v.as_str());
            Ok(json!({ "locales": set.get_locales(project, context) }))
        }

        Command::SetConvertToIcu => {
            set.convert_to_icu();
            Ok(json!({ "size": set.size() }))
        }

        Command::SetConvertToPlural => {
            set.convert_to_plural_res();
            Ok(json!({ "size": set.size() }))
        }

        _ => Err("unknown command".into()),
    }
}
