//! Built-in game content.

use super::{
    Era, Feature, GoalDef, GoalId, ResearchDef, ResearchEffect, UnlockRule, UpgradeDef,
    UpgradeEffect, View,
};
use crate::math::{cents, dollars};

pub(super) fn upgrades() -> Vec<UpgradeDef> {
    vec![
        // Terminal era
        UpgradeDef::new(
            "intern",
            "Hire Intern",
            25,
            150,
            Era::Terminal,
            UpgradeEffect::ResearchSpeed { percent: 50 },
        )
        .with_description("Enables research and speeds up projects.")
        .with_opens_view(View::Research),
        UpgradeDef::new(
            "coffee-machine",
            "Coffee Machine",
            10,
            130,
            Era::Terminal,
            UpgradeEffect::PassiveIncome { per_unit: cents(50) },
        )
        .with_description("Generates small passive income from vending."),
        UpgradeDef::new(
            "script",
            "Automated Script",
            50,
            180,
            Era::Terminal,
            UpgradeEffect::PassiveIncome { per_unit: dollars(1) },
        )
        .with_description("Generates passive income."),
        UpgradeDef::new(
            "tooling",
            "Development Tooling",
            100,
            160,
            Era::Terminal,
            UpgradeEffect::AssemblyValue { per_unit: dollars(1) },
        )
        .with_description("Improves assembly efficiency.")
        .with_unlock(UnlockRule::MoneyAtLeast(dollars(50))),
        UpgradeDef::new(
            "assembly-optimizer",
            "Assembly Optimizer",
            150,
            170,
            Era::Terminal,
            UpgradeEffect::AssemblyValue { per_unit: dollars(2) },
        )
        .with_description("Increases income per assembly.")
        .with_unlock(UnlockRule::ResearchCompleted("efficiency-research".to_string())),
        UpgradeDef::new(
            "script-enhancer",
            "Script Enhancer",
            300,
            190,
            Era::Terminal,
            UpgradeEffect::IncomeBoost {
                target: "script".to_string(),
                per_unit: cents(50),
            },
        )
        .with_description("Boosts script output.")
        .with_unlock(UnlockRule::ResearchCompleted("automation-theory".to_string())),
        UpgradeDef::new(
            "intern-manager",
            "Intern Manager",
            500,
            200,
            Era::Terminal,
            UpgradeEffect::ResearchSpeedBoost {
                target: "intern".to_string(),
                percent: 25,
            },
        )
        .with_description("Improves intern productivity.")
        .with_unlock(UnlockRule::OwnedAtLeast {
            upgrade: "intern".to_string(),
            count: 3,
        }),
        // GUI era
        UpgradeDef::new(
            "mouse-upgrade",
            "Ergonomic Mouse",
            15,
            140,
            Era::Gui,
            UpgradeEffect::ClickValue { per_unit: cents(50) },
        )
        .with_description("Increases button press efficiency."),
        UpgradeDef::new(
            "auto-clicker",
            "Auto-Clicker",
            100,
            160,
            Era::Gui,
            UpgradeEffect::ClickIncome { per_unit: dollars(1) },
        )
        .with_description("Automatically presses buttons.")
        .with_unlock(UnlockRule::ButtonPressesAtLeast(50)),
        UpgradeDef::new(
            "gui-framework",
            "GUI Framework",
            250,
            180,
            Era::Gui,
            UpgradeEffect::Feature(Feature::WindowManagement),
        )
        .with_description("Unlocks advanced interface features.")
        .with_unlock(UnlockRule::ResearchCompleted("window-manager".to_string())),
        UpgradeDef::new(
            "graphics-card",
            "Graphics Accelerator",
            500,
            200,
            Era::Gui,
            UpgradeEffect::ClickValue { per_unit: dollars(2) },
        )
        .with_description("Improves visual rendering speed.")
        .with_unlock(UnlockRule::ResearchCompleted("graphics-api".to_string())),
    ]
}

pub(super) fn research() -> Vec<ResearchDef> {
    vec![
        // Terminal era
        ResearchDef::new("basic-macro", "Basic Macro", 30, &["intern"], Era::Terminal)
            .with_description("Shortens \"assemble\" to \"asmb\"")
            .with_effect(ResearchEffect::AssemblyAlias("asmb".to_string())),
        ResearchDef::new(
            "advanced-macro",
            "Advanced Macro",
            45,
            &["basic-macro"],
            Era::Terminal,
        )
        .with_description("Shortens \"asmb\" to \"a\"")
        .with_effect(ResearchEffect::AssemblyAlias("a".to_string())),
        ResearchDef::new(
            "clipboard-api",
            "Clipboard API",
            60,
            &["basic-macro", "advanced-macro"],
            Era::Terminal,
        )
        .with_description("Enables copy-paste functionality")
        .with_effect(ResearchEffect::Feature(Feature::Clipboard)),
        ResearchDef::new(
            "ascii-schematics",
            "ASCII Art Schematics",
            25,
            &["intern"],
            Era::Terminal,
        )
        .with_description("Adds visual assembly diagrams")
        .with_effect(ResearchEffect::Feature(Feature::AsciiSchematics)),
        ResearchDef::new("improved-cli", "Improved CLI", 40, &["intern"], Era::Terminal)
            .with_description("Adds color-coding and better output")
            .with_effect(ResearchEffect::Feature(Feature::ColorOutput)),
        ResearchDef::new(
            "stats-dashboard",
            "Stats Dashboard",
            35,
            &["intern"],
            Era::Terminal,
        )
        .with_description("Unlocks detailed statistics tracking")
        .with_effect(ResearchEffect::OpenView(View::Stats)),
        ResearchDef::new(
            "efficiency-research",
            "Efficiency Research",
            90,
            &["improved-cli"],
            Era::Terminal,
        )
        .with_description("Unlocks advanced tooling upgrades"),
        ResearchDef::new(
            "automation-theory",
            "Automation Theory",
            120,
            &["basic-macro"],
            Era::Terminal,
        )
        .with_description("Unlocks script enhancement upgrades"),
        ResearchDef::new(
            "project-gui",
            "Project GUI",
            300,
            &[
                "basic-macro",
                "advanced-macro",
                "clipboard-api",
                "ascii-schematics",
                "stats-dashboard",
            ],
            Era::Terminal,
        )
        .with_description("WIMP Interface Development - Unlocks transition to GUI era")
        .with_effect(ResearchEffect::EraGate),
        // GUI era
        ResearchDef::new("window-manager", "Window Manager", 60, &[], Era::Gui)
            .with_description("Enables multiple window support")
            .unlocked_at_start(),
        ResearchDef::new("event-system", "Event System", 90, &["window-manager"], Era::Gui)
            .with_description("Improves user interaction handling"),
        ResearchDef::new("graphics-api", "Graphics API", 120, &["event-system"], Era::Gui)
            .with_description("Accelerated graphics rendering"),
        ResearchDef::new(
            "networking-stack",
            "Networking Stack",
            180,
            &["graphics-api"],
            Era::Gui,
        )
        .with_description("Prepares for Internet era transition")
        .with_effect(ResearchEffect::EraGate),
    ]
}

pub(super) fn goals() -> Vec<GoalDef> {
    vec![
        // Terminal era
        GoalDef::new(
            GoalId::FirstHelp,
            "Learn the Interface",
            "Type 'help' in the terminal to see available commands",
            Era::Terminal,
            true,
        ),
        GoalDef::new(
            GoalId::FirstAssembly,
            "First Assembly",
            "Type 'assemble' to earn your first dollar",
            Era::Terminal,
            false,
        ),
        GoalDef::new(
            GoalId::HireIntern,
            "Hire Your First Intern",
            "Purchase an intern to unlock research capabilities",
            Era::Terminal,
            false,
        ),
        GoalDef::new(
            GoalId::FirstResearch,
            "Begin Research",
            "Start your first research project to improve efficiency",
            Era::Terminal,
            false,
        ),
        GoalDef::new(
            GoalId::GuiTransition,
            "Reach GUI Era",
            "Complete 'Project GUI' research, then type 'transition gui'",
            Era::Terminal,
            false,
        ),
        // GUI era
        GoalDef::new(
            GoalId::FirstClick,
            "First Button Press",
            "Press the button to start earning in the GUI era",
            Era::Gui,
            true,
        ),
        GoalDef::new(
            GoalId::GuiUpgrade,
            "Improve Your Setup",
            "Purchase your first GUI-era upgrade",
            Era::Gui,
            false,
        ),
        GoalDef::new(
            GoalId::Automation,
            "Automate Production",
            "Research and implement automated systems",
            Era::Gui,
            false,
        ),
    ]
}
