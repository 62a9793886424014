//! Synthetic identities used while a demo session is active.

use crate::models::{DemoProfile, Role};

/// The fixed profile a demo session shows for `role`.
pub fn create_demo_profile(role: Role) -> DemoProfile {
    let (display_name, department, phone, email) = match role {
        Role::Admin => (
            "Demo Administrator",
            "Administration",
            "+91 90000 00001",
            "admin.demo@example.com",
        ),
        Role::Marketing => (
            "Demo Marketing Lead",
            "Marketing",
            "+91 90000 00002",
            "marketing.demo@example.com",
        ),
        Role::Packing => (
            "Demo Packing Supervisor",
            "Packing & Dispatch",
            "+91 90000 00003",
            "packing.demo@example.com",
        ),
        Role::Academic => (
            "Demo Academic Coordinator",
            "Academics",
            "+91 90000 00004",
            "academic.demo@example.com",
        ),
        Role::Accounts => (
            "Demo Accounts Officer",
            "Accounts",
            "+91 90000 00005",
            "accounts.demo@example.com",
        ),
        Role::Training => (
            "Demo Trainer",
            "Training",
            "+91 90000 00006",
            "training.demo@example.com",
        ),
    };

    DemoProfile {
        role,
        display_name,
        department,
        phone,
        email,
        dashboard_path: role.dashboard_path(),
    }
}
