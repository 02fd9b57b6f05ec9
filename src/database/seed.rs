use uuid::Uuid;

use super::models::{Company, Employee, NewCompany};

pub const IT_SOLUTIONS_ID: Uuid = Uuid::from_u128(0xc9d4c053_49b6_410c_bc78_2d54a9991870);
pub const ADMIN_SOLUTIONS_ID: Uuid = Uuid::from_u128(0x3d490a70_94ce_4d15_9494_5248280c2ce3);

pub const SAM_RAIDEN_ID: Uuid = Uuid::from_u128(0x80abbca8_664d_4b20_b5de_024705497d4a);
pub const JANA_MCLEAF_ID: Uuid = Uuid::from_u128(0x86dba8c0_d178_41e7_938c_ed49778fb52a);
pub const KANE_MILLER_ID: Uuid = Uuid::from_u128(0x021ca3c1_0deb_4afd_ae94_2159a8479811);

/// Rows loaded by `migrations/0002_seed.sql` and by the seeded memory store.
pub fn seed_data() -> Vec<NewCompany> {
    vec![
        NewCompany {
            company: Company {
                id: IT_SOLUTIONS_ID,
                name: "IT_Solutions Ltd".into(),
                address: "583 Wall Dr. Gwynn Oak, MD 21207".into(),
                country: Some("USA".into()),
            },
            employees: vec![
                employee(SAM_RAIDEN_ID, IT_SOLUTIONS_ID, "Sam Raiden", 26, "Software developer"),
                employee(JANA_MCLEAF_ID, IT_SOLUTIONS_ID, "Jana McLeaf", 30, "Software developer"),
            ],
        },
        NewCompany {
            company: Company {
                id: ADMIN_SOLUTIONS_ID,
                name: "Admin_Solutions Ltd".into(),
                address: "312 Forest Avenue, BF 923".into(),
                country: Some("USA".into()),
            },
            employees: vec![employee(KANE_MILLER_ID, ADMIN_SOLUTIONS_ID, "Kane Miller", 35, "Administrator")],
        },
    ]
}

fn employee(id: Uuid, company_id: Uuid, name: &str, age: i32, position: &str) -> Employee {
    Employee {
        id,
        company_id,
        name: name.into(),
        age,
        position: position.into(),
    }
}
