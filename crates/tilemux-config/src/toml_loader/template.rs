//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
///
/// Shell profiles are left commented out so the platform defaults apply
/// until the user lists their own.
pub(crate) fn default_config_toml() -> String {
    r##"# tilemux configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

# default_shell_id = "bash"
# default_cwd = "~/projects"   # unset = home directory

[terminal]
# font_size = 14          # 8-32, also the zoom reset size
# font_family = "CaskaydiaCove Nerd Font, CaskaydiaCove NF, Cascadia Code, Consolas, monospace"
# scrollback = 5000       # 0-100000

[session]
# autosave_interval_secs = 5   # 1-3600
# restore_on_startup = true

# Listing any [[shells]] replaces the platform defaults.
# [[shells]]
# id = "bash"
# name = "bash"
# path = "/bin/bash"
# args = []
# cwd = "/home/me"
#
# [shells.env]
# EDITOR = "nvim"

# Listing any [[keybindings]] replaces the default table.
# Each key may appear once; an action may have several keys.
# [[keybindings]]
# action = "createTerminal"
# key = "Ctrl+Shift+N"
"##
    .to_string()
}
