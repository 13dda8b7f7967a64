//! SVG icon components
//!
//! Icons from Heroicons (https://heroicons.com)

use yew::prelude::*;

/// Common props for all icons
#[derive(Properties, PartialEq, Clone)]
pub struct IconProps {
    #[prop_or("w-5 h-5".into())]
    pub class: AttrValue,
}

/// Dashboard icon (home)
#[function_component(DashboardIcon)]
pub fn dashboard_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M3 12l2-2m0 0l7-7 7 7M5 10v10a1 1 0 001 1h3m10-11l2 2m-2-2v10a1 1 0 01-1 1h-3m-6 0a1 1 0 001-1v-4a1 1 0 011-1h2a1 1 0 011 1v4a1 1 0 001 1m-6 0h6" />
        </svg>
    }
}

/// Skills icon (cube)
#[function_component(SkillsIcon)]
pub fn skills_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M20 7l-8-4-8 4m16 0l-8 4m8-4v10l-8 4m0-10L4 7m8 4v10M4 7v10l8 4" />
        </svg>
    }
}

/// Play icon (for run)
#[function_component(PlayIcon)]
pub fn play_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M14.752 11.168l-3.197-2.132A1 1 0 0010 9.87v4.263a1 1 0 001.555.832l3.197-2.132a1 1 0 000-1.664z" />
            <path stroke-linecap="round" stroke-linejoin="round" d="M21 12a9 9 0 11-18 0 9 9 0 0118 0z" />
        </svg>
    }
}

/// History icon (clock)
#[function_component(HistoryIcon)]
pub fn history_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M12 8v4l3 3m6-3a9 9 0 11-18 0 9 9 0 0118 0z" />
        </svg>
    }
}

/// Settings icon (cog)
#[function_component(SettingsIcon)]
pub fn settings_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M10.325 4.317c.426-1.756 2.924-1.756 3.35 0a1.724 1.724 0 002.573 1.066c1.543-.94 3.31.826 2.37 2.37a1.724 1.724 0 001.065 2.572c1.756.426 1.756 2.924 0 3.35a1.724 1.724 0 00-1.066 2.573c.94 1.543-.826 3.31-2.37 2.37a1.724 1.724 0 00-2.572 1.065c-.426 1.756-2.924 1.756-3.35 0a1.724 1.724 0 00-2.573-1.066c-1.543.94-3.31-.826-2.37-2.37a1.724 1.724 0 00-1.065-2.572c-1.756-.426-1.756-2.924 0-3.35a1.724 1.724 0 001.066-2.573c-.94-1.543.826-3.31 2.37-2.37.996.608 2.296.07 2.572-1.065z" />
            <path stroke-linecap="round" stroke-linejoin="round" d="M15 12a3 3 0 11-6 0 3 3 0 016 0z" />
        </svg>
    }
}

/// Search icon
#[function_component(SearchIcon)]
pub fn search_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M21 21l-6-6m2-5a7 7 0 11-14 0 7 7 0 0114 0z" />
        </svg>
    }
}

/// Plus icon
#[function_component(PlusIcon)]
pub fn plus_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M12 4v16m8-8H4" />
        </svg>
    }
}

/// Check icon
#[function_component(CheckIcon)]
pub fn check_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M5 13l4 4L19 7" />
        </svg>
    }
}

/// X icon (close)
#[function_component(XIcon)]
pub fn x_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M6 18L18 6M6 6l12 12" />
        </svg>
    }
}

/// Chevron right icon
#[function_component(ChevronRightIcon)]
pub fn chevron_right_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M9 5l7 7-7 7" />
        </svg>
    }
}

/// External link icon
#[function_component(ExternalLinkIcon)]
pub fn external_link_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M10 6H6a2 2 0 00-2 2v10a2 2 0 002 2h10a2 2 0 002-2v-4M14 4h6m0 0v6m0-6L10 14" />
        </svg>
    }
}

/// Copy icon
#[function_component(CopyIcon)]
pub fn copy_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M8 16H6a2 2 0 01-2-2V6a2 2 0 012-2h8a2 2 0 012 2v2m-6 12h8a2 2 0 002-2v-8a2 2 0 00-2-2h-8a2 2 0 00-2 2v8a2 2 0 002 2z" />
        </svg>
    }
}

/// Refresh icon
#[function_component(RefreshIcon)]
pub fn refresh_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M4 4v5h.582m15.356 2A8.001 8.001 0 004.582 9m0 0H9m11 11v-5h-.581m0 0a8.003 8.003 0 01-15.357-2m15.357 2H15" />
        </svg>
    }
}

/// Terminal icon
#[function_component(TerminalIcon)]
pub fn terminal_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M8 9l3 3-3 3m5 0h3M5 20h14a2 2 0 002-2V6a2 2 0 00-2-2H5a2 2 0 00-2 2v12a2 2 0 002 2z" />
        </svg>
    }
}

/// Lightning bolt icon (for skills/power)
#[function_component(LightningIcon)]
pub fn lightning_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M13 10V3L4 14h7v7l9-11h-7z" />
        </svg>
    }
}

/// Folder icon
#[function_component(FolderIcon)]
pub fn folder_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M3 7v10a2 2 0 002 2h14a2 2 0 002-2V9a2 2 0 00-2-2h-6l-2-2H5a2 2 0 00-2 2z" />
        </svg>
    }
}

/// Download icon
#[function_component(DownloadIcon)]
pub fn download_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M4 16v1a3 3 0 003 3h10a3 3 0 003-3v-1m-4-4l-4 4m0 0l-4-4m4 4V4" />
        </svg>
    }
}

/// Analytics/Chart icon
#[function_component(AnalyticsIcon)]
pub fn analytics_icon(props: &IconProps) -> Html {
    html! {
        <svg class={&props.class} fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">
            <path stroke-linecap="round" stroke-linejoin="round" d="M9 19v-6a2 2 0 00-2-2H5a2 2 0 00-2 2v6a2 2 0 002 2h2a2 2 0 002-2zm0 0V9a2 2 0 012-2h2a2 2 0 012 2v10m-6 0a2 2 0 002 2h2a2 2 0 002-2m0 0V5a2 2 0 012-2h2a2 2 0 012 2v14a2 2 0 01-2 2h-2a2 2 0 01-2-2z" />
        </svg>
    }
}
