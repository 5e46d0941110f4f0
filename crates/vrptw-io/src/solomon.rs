//! Parser for Solomon-format VRPTW instance files.
//!
//! Format (whitespace-separated, one logical record per line):
//!
//! ```text
//! <instance name>
//! VEHICLE
//! NUMBER     CAPACITY
//! <K>        <Q>
//! CUSTOMER
//! CUST NO.  XCOORD.  YCOORD.  DEMAND  READY TIME  DUE DATE  SERVICE TIME
//! <one row per customer, id 0..N, id 0 is the depot>
//! ```
//!
//! Blank lines between sections are tolerated and ignored.

use vrptw_core::{RawInstance, VrptwError, VrptwResult};

pub fn parse_solomon(text: &str) -> VrptwResult<RawInstance> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return Err(VrptwError::InstanceError("empty instance file".into()));
    }

    let name = lines[0].to_string();

    let vehicle_idx = find_section(&lines, "VEHICLE")?;
    // vehicle_idx+1 is the "NUMBER CAPACITY" header, vehicle_idx+2 is the data row.
    let vehicle_row = lines.get(vehicle_idx + 2).ok_or_else(|| {
        VrptwError::InstanceError("missing vehicle count/capacity row after VEHICLE section".into())
    })?;
    let mut vehicle_fields = vehicle_row.split_whitespace();
    let k: usize = parse_field(vehicle_fields.next(), "vehicle count")?;
    let capacity: f64 = parse_field(vehicle_fields.next(), "vehicle capacity")?;

    let customer_idx = find_section(&lines, "CUSTOMER")?;
    // customer_idx+1 is the column header row; data starts at customer_idx+2.
    let data_start = customer_idx + 2;
    if data_start >= lines.len() {
        return Err(VrptwError::InstanceError("no customer rows found".into()));
    }

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut demand = Vec::new();
    let mut ready = Vec::new();
    let mut due = Vec::new();
    let mut service = Vec::new();

    for (row_offset, line) in lines[data_start..].iter().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(VrptwError::InstanceError(format!(
                "customer row {} has {} fields, expected 7: {:?}",
                row_offset, fields.len(), line
            )));
        }
        let id: usize = parse_field(fields.first().copied(), "customer id")?;
        if id != row_offset {
            return Err(VrptwError::InstanceError(format!(
                "customer rows must be in order 0..N; expected id {} got {}",
                row_offset, id
            )));
        }
        x.push(parse_field(fields.get(1).copied(), "xcoord")?);
        y.push(parse_field(fields.get(2).copied(), "ycoord")?);
        let d: f64 = parse_field(fields.get(3).copied(), "demand")?;
        let r: f64 = parse_field(fields.get(4).copied(), "ready time")?;
        let due_date: f64 = parse_field(fields.get(5).copied(), "due date")?;
        let s: f64 = parse_field(fields.get(6).copied(), "service time")?;

        if d < 0.0 {
            return Err(VrptwError::InstanceError(format!(
                "customer {} has negative demand {}", id, d
            )));
        }
        if r > due_date {
            return Err(VrptwError::InstanceError(format!(
                "customer {} has ready_time {} > due_date {}", id, r, due_date
            )));
        }

        demand.push(d);
        ready.push(r);
        due.push(due_date);
        service.push(s);
    }

    let n = demand.len().saturating_sub(1);

    Ok(RawInstance {
        name,
        n,
        k,
        capacity,
        x,
        y,
        demand,
        ready,
        due,
        service,
    })
}

fn find_section(lines: &[&str], keyword: &str) -> VrptwResult<usize> {
    lines
        .iter()
        .position(|l| l.eq_ignore_ascii_case(keyword))
        .ok_or_else(|| VrptwError::InstanceError(format!("missing '{}' section", keyword)))
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, what: &str) -> VrptwResult<T> {
    field
        .ok_or_else(|| VrptwError::InstanceError(format!("missing {} field", what)))?
        .parse()
        .map_err(|_| VrptwError::InstanceError(format!("could not parse {} field", what)))
}
