use minijinja::value::Rest;
use minijinja::{Environment, Error, ErrorKind, Value};

/// Functions available to field templates; the item being resolved is bound
/// as `json` and its position as `index`.
pub fn create_environment() -> Environment<'static> {
    let mut env = Environment::new();

    // String Functions
    env.add_function("CONCAT", concat);
    env.add_function("UPPER", upper);
    env.add_function("LOWER", lower);
    env.add_function("TRIM", trim);

    // Math Functions
    env.add_function("ROUND", round);

    env
}

fn concat(args: Rest<Value>) -> String {
    let mut result = String::new();
    for arg in args.0 {
        if let Some(s) = arg.as_str() {
            result.push_str(s);
        } else {
            result.push_str(&arg.to_string());
        }
    }
    result
}

fn upper(s: String) -> String {
    s.to_uppercase()
}

fn lower(s: String) -> String {
    s.to_lowercase()
}

fn trim(s: String) -> String {
    s.trim().to_string()
}

fn to_f64(v: &Value) -> Result<f64, Error> {
    if let Ok(f) = f64::try_from(v.clone()) {
        Ok(f)
    } else if let Ok(i) = i64::try_from(v.clone()) {
        Ok(i as f64)
    } else if let Some(s) = v.as_str() {
        s.parse::<f64>()
            .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("Cannot parse number: {}", e)))
    } else {
        Err(Error::new(ErrorKind::InvalidOperation, format!("Expected number, got {:?}", v)))
    }
}

fn round(val: Value, precision: Option<i32>) -> Result<Value, Error> {
    let num = to_f64(&val)?;
    let p = precision.unwrap_or(0);
    if p == 0 {
        return Ok(Value::from(num.round() as i64));
    }
    let factor = 10f64.powi(p);
    Ok(Value::from((num * factor).round() / factor))
}
