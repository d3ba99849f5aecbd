use serde_json::{json, Value};

use crate::exercise_engine::{
    engines::{
        matching::MatchItems,
        order::OrderItems,
        select_all::SelectAll,
        sort::{SortItems, SortZone},
        Exercise,
    },
    models::{ControlPanel, Item, PanelState},
    page::{ExerciseInstance, Page},
    timer::{Clock, Timer},
};

/// Base CSS classes plus one per set flag.
fn class_list(base: &[&str], item: &Item) -> Vec<String> {
    base.iter()
        .copied()
        .chain(item.flags.classes())
        .map(str::to_string)
        .collect()
}

fn order_item(item: &Item) -> Value {
    json!({
        "id": item.id.0,
        "tag": "li",
        "text": item.text,
        "draggable": item.draggable,
        "class": class_list(&[], item),
    })
}

fn order_list(e: &OrderItems) -> Value {
    json!({
        "class": ["dp-order"],
        "items": e.items().into_iter().map(order_item).collect::<Vec<_>>(),
    })
}

fn match_body(e: &MatchItems) -> Value {
    let items: Vec<Value> = e
        .match_items()
        .iter()
        .map(|m| {
            json!({
                "id": m.item.id.0,
                "tag": m.side.tag(),
                "text": m.item.text,
                "data-pair-id": m.pair_id,
                "class": class_list(&[], &m.item),
                "checkmark": m.item.flags.checkmark.then_some("checkmark"),
            })
        })
        .collect();
    let pairs: Vec<Value> = e
        .matched_pairs()
        .iter()
        .map(|p| json!({ "class": ["matched-pair"], "pair-items": [p.first, p.second] }))
        .collect();
    json!({
        "class": ["dp-match-text"],
        "items": items,
        "matched_items": {
            "class": ["dp-matched-items"],
            "heading": "Matched Items",
            "pairs": pairs,
        },
    })
}

fn select_list(e: &SelectAll) -> Value {
    let items: Vec<Value> = e
        .select_items()
        .iter()
        .map(|s| {
            let mut base = vec![];
            if s.correct {
                base.push("dp-sa-correct");
            }
            json!({
                "id": s.item.id.0,
                "tag": "li",
                "text": s.item.text,
                "class": class_list(&base, &s.item),
                "role": "checkbox",
                "tabindex": 0,
                "aria-checked": s.item.flags.selected.to_string(),
            })
        })
        .collect();
    json!({ "class": ["dp-sa-list"], "items": items })
}

fn sort_zone(e: &SortItems, zone: SortZone) -> Value {
    let items: Vec<Value> = e
        .items_in(zone)
        .iter()
        .filter_map(|&id| e.item(id))
        .map(|s| {
            let mut class = class_list(&["dp-si-item-text"], &s.item);
            if s.image.is_some() {
                class.insert(1, "dp-si-item-figure".to_string());
            }
            if s.item.flags.checkmark {
                class.push("sort-success-item".to_string());
            }
            json!({
                "id": s.item.id.0,
                "tag": "li",
                "text": s.item.text,
                "image": s.image,
                "draggable": s.item.draggable,
                "class": class,
                "checkmark": s.item.flags.checkmark.then_some("success-checkmark"),
            })
        })
        .collect();

    let mut class = vec!["dp-si-sort-bucket"];
    if zone == SortZone::Pool {
        class.push("dp-si-sort-answer-bank");
    }
    if e.is_highlighted(zone) {
        class.push("drag-over");
    }
    let label = match zone {
        SortZone::Pool => "Answer Bank",
        SortZone::Bucket(i) => e.buckets().get(i).map(|b| b.label.as_str()).unwrap_or(""),
    };
    json!({ "label": label, "class": class, "items": items })
}

fn sort_body(e: &SortItems) -> Value {
    let buckets: Vec<Value> = (0..e.buckets().len())
        .map(|i| sort_zone(e, SortZone::Bucket(i)))
        .collect();
    json!({
        "answer_bank": sort_zone(e, SortZone::Pool),
        "buckets": buckets,
    })
}

fn control_panel(panel: &ControlPanel, timer: &Timer, after: &str) -> Value {
    let mut class = vec![panel.kind.panel_class()];
    if panel.state == PanelState::Success {
        class.push(panel.kind.success_class());
    }
    json!({
        "insert_after": after,
        "class": class,
        "buttons": panel.buttons.iter().map(|b| b.label()).collect::<Vec<_>>(),
        "score_text": panel.score_text,
        "attempts": panel.attempts,
        "timer_text": timer.display(),
    })
}

/// Render one instance as the JSON view the page script applies to the DOM.
pub fn render_instance(instance: &ExerciseInstance) -> Value {
    let ex = instance.as_exercise();
    let body = match instance {
        ExerciseInstance::Order(e)     => order_list(e),
        ExerciseInstance::Match(e)     => match_body(e),
        ExerciseInstance::SelectAll(e) => select_list(e),
        ExerciseInstance::Sort(e)      => sort_body(e),
    };
    json!({
        "container": ex.container().0,
        "kind": ex.kind().to_string(),
        "class": [ex.kind().container_class()],
        "body": body,
        "control_panel": control_panel(ex.panel(), ex.timer(), &ex.container().0),
    })
}

/// Render every mounted instance, in mount order.
pub fn render_page<C: Clock>(page: &Page<C>) -> Value {
    json!({
        "instances": page.instances().map(render_instance).collect::<Vec<_>>(),
        "skipped": page.skipped().iter().map(|e| e.to_string()).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise_engine::{ContainerId, EngineConfig, ManualClock};

    const DOC: &str = r#"{ "exercises": [
        { "kind": "select_all", "container": "sa", "list": [
            { "text": "Red", "correct": true }, { "text": "Dog" } ] },
        { "kind": "sort_items", "container": "pool",
          "answer_bank": { "items": [ { "text": "Pear", "bucket": "Fruit" },
                                    { "text": "Fig", "bucket": "Fruit", "image": "img/fig.png" } ] },
          "buckets": [ { "label": "Fruit" } ] },
        { "kind": "order_items", "container": "broken" }
    ] }"#;

    #[test]
    fn renders_classes_and_panel() {
        let clock = ManualClock::new(0);
        let mut page = Page::from_json(DOC, EngineConfig::seeded(1), clock.clone()).unwrap();
        let sa = ContainerId::from("sa");
        let red = {
            let e = page.select_all_mut(&sa).unwrap();
            let red = e.select_items().iter().find(|s| s.correct).unwrap().item.id;
            e.click(red);
            red
        };
        clock.advance(3_000);
        page.select_all_mut(&sa).unwrap().check(3_000);

        let view = render_page(&page);
        let first = &view["instances"][0];
        assert_eq!(first["class"], json!(["dp-si-sa"]));
        assert_eq!(first["control_panel"]["class"], json!(["dp-sa-controls", "success"]));
        assert_eq!(first["control_panel"]["score_text"], json!("1/1"));
        assert_eq!(first["control_panel"]["timer_text"], json!("0:03"));
        assert_eq!(first["control_panel"]["insert_after"], json!("sa"));

        let items = first["body"]["items"].as_array().unwrap();
        let red_view = items.iter().find(|i| i["id"] == json!(red.0)).unwrap();
        assert_eq!(red_view["class"], json!(["dp-sa-correct", "selected", "revealed"]));
        assert_eq!(red_view["aria-checked"], json!("true"));
        assert_eq!(red_view["role"], json!("checkbox"));

        let sort = &view["instances"][1];
        assert_eq!(sort["body"]["answer_bank"]["class"], json!(["dp-si-sort-bucket", "dp-si-sort-answer-bank"]));
        assert_eq!(sort["body"]["buckets"][0]["label"], json!("Fruit"));
        assert_eq!(sort["control_panel"]["buttons"], json!(["Check", "Shuffle", "Reset"]));
        let pool = sort["body"]["answer_bank"]["items"].as_array().unwrap();
        let fig = pool.iter().find(|i| i["text"] == json!("Fig")).unwrap();
        assert_eq!(fig["class"], json!(["dp-si-item-text", "dp-si-item-figure"]));
        assert_eq!(fig["image"], json!("img/fig.png"));
        let pear = pool.iter().find(|i| i["text"] == json!("Pear")).unwrap();
        assert_eq!(pear["image"], json!(null));

        assert_eq!(view["skipped"].as_array().unwrap().len(), 1);
    }
}
