use serde_json::Value;

/// Replaces census missing-data sentinels in a record's top-level fields with null
pub fn clean_record(record: &mut Value, sentinel: f64) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };

    for value in fields.values_mut() {
        if is_sentinel(value, sentinel) {
            *value = Value::Null;
        }
    }
}

pub fn clean_records(records: &mut [Value], sentinel: f64) {
    for record in records.iter_mut() {
        clean_record(record, sentinel);
    }
}

fn is_sentinel(value: &Value, sentinel: f64) -> bool {
    value.as_f64().is_some_and(|v| v == sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SENTINEL: f64 = -666666666.0;

    #[test]
    fn test_sentinels_become_null() {
        let mut record = json!({
            "name": "Census Tract 12",
            "med_home_value": -666666666,
            "med_hh_income": -666666666.0,
            "pct_hispanic": 31.5,
            "pct_vacancy": 0
        });

        clean_record(&mut record, SENTINEL);

        assert_eq!(record["med_home_value"], Value::Null);
        assert_eq!(record["med_hh_income"], Value::Null);
        assert_eq!(record["pct_hispanic"], json!(31.5));
        assert_eq!(record["pct_vacancy"], json!(0));
        assert_eq!(record["name"], json!("Census Tract 12"));
    }

    #[test]
    fn test_non_objects_are_left_alone() {
        let mut records = vec![json!(-666666666), json!({"pct_snap": -666666666})];

        clean_records(&mut records, SENTINEL);

        assert_eq!(records[0], json!(-666666666));
        assert_eq!(records[1]["pct_snap"], Value::Null);
    }
}
