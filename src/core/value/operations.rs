use super::types::Value;

impl Value {
    /// 加法运算
    pub fn add(&self, other: &Value) -> Result<Value, String> {
        use Value::*;
        match (self, other) {
            (Null, _) | (_, Null) => Ok(Null),
            (Int(a), Int(b)) => a
                .checked_add(*b)
                .map(Int)
                .ok_or_else(|| "整数加法溢出".to_string()),
            (Float(a), Float(b)) => Ok(Float(a + b)),
            (Int(a), Float(b)) => Ok(Float(*a as f64 + b)),
            (Float(a), Int(b)) => Ok(Float(a + *b as f64)),
            _ => Err("无法对这些类型的值进行加法运算".to_string()),
        }
    }

    /// 减法运算
    pub fn sub(&self, other: &Value) -> Result<Value, String> {
        use Value::*;
        match (self, other) {
            (Null, _) | (_, Null) => Ok(Null),
            (Int(a), Int(b)) => a
                .checked_sub(*b)
                .map(Int)
                .ok_or_else(|| "整数减法溢出".to_string()),
            (Float(a), Float(b)) => Ok(Float(a - b)),
            (Int(a), Float(b)) => Ok(Float(*a as f64 - b)),
            (Float(a), Int(b)) => Ok(Float(a - *b as f64)),
            _ => Err("无法对这些值进行减法运算".to_string()),
        }
    }

    /// 乘法运算
    pub fn mul(&self, other: &Value) -> Result<Value, String> {
        use Value::*;
        match (self, other) {
            (Null, _) | (_, Null) => Ok(Null),
            (Int(a), Int(b)) => a
                .checked_mul(*b)
                .map(Int)
                .ok_or_else(|| "整数乘法溢出".to_string()),
            (Float(a), Float(b)) => Ok(Float(a * b)),
            (Int(a), Float(b)) => Ok(Float(*a as f64 * b)),
            (Float(a), Int(b)) => Ok(Float(a * *b as f64)),
            _ => Err("无法对这些值进行乘法运算".to_string()),
        }
    }

    /// 除法运算
    pub fn div(&self, other: &Value) -> Result<Value, String> {
        use Value::*;
        match (self, other) {
            (Null, _) | (_, Null) => Ok(Null),
            (Int(_), Int(0)) => Err("除数为零".to_string()),
            (Int(a), Int(b)) => a
                .checked_div(*b)
                .map(Int)
                .ok_or_else(|| "整数除法溢出".to_string()),
            (Float(a), Float(b)) => Ok(Float(a / b)),
            (Int(a), Float(b)) => Ok(Float(*a as f64 / b)),
            (Float(a), Int(b)) => Ok(Float(a / *b as f64)),
            _ => Err("无法对这些值进行除法运算".to_string()),
        }
    }

    /// 取模运算
    pub fn rem(&self, other: &Value) -> Result<Value, String> {
        use Value::*;
        match (self, other) {
            (Null, _) | (_, Null) => Ok(Null),
            (Int(_), Int(0)) => Err("除数为零".to_string()),
            (Int(a), Int(b)) => a
                .checked_rem(*b)
                .map(Int)
                .ok_or_else(|| "整数取模溢出".to_string()),
            (Float(a), Float(b)) => Ok(Float(a % b)),
            (Int(a), Float(b)) => Ok(Float(*a as f64 % b)),
            (Float(a), Int(b)) => Ok(Float(a % *b as f64)),
            _ => Err("无法对这些值进行取模运算".to_string()),
        }
    }

    /// 取负
    pub fn neg(&self) -> Result<Value, String> {
        match self {
            Value::Null => Ok(Value::Null),
            Value::Int(a) => a
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| "整数取负溢出".to_string()),
            Value::Float(a) => Ok(Value::Float(-a)),
            _ => Err("无法对该值取负".to_string()),
        }
    }

    /// 字符串连接
    pub fn concat(&self, other: &Value) -> Result<Value, String> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => Err("只能连接字符串".to_string()),
        }
    }
}
