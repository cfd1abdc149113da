mod app_command;
